use serde::Serialize;

use crate::domain::{NutritionGoals, TotalNutrition};

/// Goal progress per macro, clamped to [0, 100] for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroProgress {
    pub protein: u8,
    pub carbs: u8,
    pub fat: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct NutritionSummary {
    pub totals: TotalNutrition,
    pub goals: NutritionGoals,
    /// Negative when the user is over goal; callers display it as such.
    pub calories_remaining: f64,
    pub progress: MacroProgress,
}
