use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::MealType;

#[derive(Debug, Deserialize)]
pub struct AddFoodRequest {
    pub food_id: Uuid,
    #[serde(default = "default_serving")]
    pub serving_size: f64,
    #[serde(default)]
    pub meal_type: MealType,
}

fn default_serving() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub struct RecentMeal {
    pub name: String,
    pub calories: f64,
}
