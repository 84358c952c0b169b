use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::Error;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const DATE_FORMAT: &[FormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` path segment into a calendar date.
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    Date::parse(raw, DATE_FORMAT).map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Catalog entry. Reference data; never mutated by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub allergens: Vec<String>,
}

/// Risk level the user assigned to an allergen entry in their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// One allergen the user is sensitive to, with its user-assigned severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergenSensitivity {
    pub name: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub daily_calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water: f64,
}

impl Default for NutritionGoals {
    // Targets handed to new users before they configure their own.
    fn default() -> Self {
        Self {
            daily_calories: 2000.0,
            protein: 120.0,
            carbs: 250.0,
            fat: 65.0,
            water: 64.0,
        }
    }
}

/// Read-only to this service; profile edits happen elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub allergens: Vec<AllergenSensitivity>,
    pub goals: NutritionGoals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

/// A logged food. Nutrient values are snapshots scaled by serving size at
/// log time, so later catalog edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub food_id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: f64,
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalNutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water: f64,
}

/// Per-user, per-date food log.
///
/// Invariant: `totals` equals the element-wise sum of the entries' scaled
/// nutrient snapshots. Water is tracked independently and never derived
/// from entries. `version` is the optimistic-concurrency token the store
/// compares on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub entries: Vec<LogEntry>,
    pub totals: TotalNutrition,
    #[serde(default)]
    pub version: i64,
}

impl DailyLog {
    pub fn empty(user_id: Uuid, date: Date) -> Self {
        Self {
            user_id,
            date,
            entries: Vec::new(),
            totals: TotalNutrition::default(),
            version: 0,
        }
    }
}

/// Derived on each query; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllergenAlert {
    pub allergen: String,
    pub severity: Severity,
    pub detected_in: String,
}
