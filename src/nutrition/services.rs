use crate::domain::{NutritionGoals, TotalNutrition};
use crate::error::Error;
use crate::nutrition::dto::{MacroProgress, NutritionSummary};

/// Pure function of the day's totals and the user's goals.
///
/// `calories_remaining` goes negative when the user is over goal and is
/// never clamped. Macro progress is clamped at 100; a zero or negative
/// macro goal cannot be divided by and fails with `InvalidGoal` instead
/// of leaking NaN or infinity into the response.
pub fn summarize(
    totals: &TotalNutrition,
    goals: &NutritionGoals,
) -> Result<NutritionSummary, Error> {
    let progress = MacroProgress {
        protein: percent_of(totals.protein, goals.protein, "protein")?,
        carbs: percent_of(totals.carbs, goals.carbs, "carbs")?,
        fat: percent_of(totals.fat, goals.fat, "fat")?,
    };
    Ok(NutritionSummary {
        totals: totals.clone(),
        goals: goals.clone(),
        calories_remaining: goals.daily_calories - totals.calories,
        progress,
    })
}

fn percent_of(total: f64, goal: f64, nutrient: &'static str) -> Result<u8, Error> {
    if !goal.is_finite() || goal <= 0.0 {
        return Err(Error::InvalidGoal { nutrient });
    }
    Ok((total / goal * 100.0).round().min(100.0) as u8)
}
