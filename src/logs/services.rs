use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::{DailyLog, FoodItem, LogEntry, MealType};
use crate::error::Error;
use crate::logs::dto::RecentMeal;
use crate::store::DataSource;

pub const RECENT_MEALS_LIMIT: usize = 3;

/// Appends a snapshot of `food`, scaled linearly by `serving_size`, and
/// folds its contribution into the running totals. Water is never touched
/// here; it has its own logging path.
///
/// Validation happens before any mutation, so a rejected entry leaves the
/// log exactly as it was.
pub fn append_entry(
    log: &mut DailyLog,
    food: &FoodItem,
    serving_size: f64,
    meal_type: MealType,
    logged_at: OffsetDateTime,
) -> Result<(), Error> {
    if !serving_size.is_finite() || serving_size <= 0.0 {
        return Err(Error::InvalidFood(format!(
            "serving size must be positive, got {serving_size}"
        )));
    }
    for (nutrient, value) in [
        ("calories", food.calories),
        ("protein", food.protein),
        ("carbs", food.carbs),
        ("fat", food.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidFood(format!(
                "{nutrient} must be non-negative, got {value}"
            )));
        }
    }

    let entry = LogEntry {
        food_id: food.id,
        name: food.name.clone(),
        calories: food.calories * serving_size,
        protein: food.protein * serving_size,
        carbs: food.carbs * serving_size,
        fat: food.fat * serving_size,
        serving_size,
        meal_type,
        logged_at,
    };

    log.totals.calories += entry.calories;
    log.totals.protein += entry.protein;
    log.totals.carbs += entry.carbs;
    log.totals.fat += entry.fat;
    log.entries.push(entry);
    Ok(())
}

/// Adds a catalog food to the (user, date) log, creating the log on first
/// use. The write is versioned; a concurrent add that lost the race
/// surfaces as [`Error::Conflict`] and is never retried here.
pub async fn add_food_to_log(
    store: &dyn DataSource,
    user_id: Uuid,
    date: Date,
    food_id: Uuid,
    serving_size: f64,
    meal_type: MealType,
) -> Result<DailyLog, Error> {
    let food = store
        .get_food_item(food_id)
        .await?
        .ok_or(Error::NotFound("food"))?;

    let mut log = store
        .get_daily_log(user_id, date)
        .await?
        .unwrap_or_else(|| DailyLog::empty(user_id, date));

    append_entry(&mut log, &food, serving_size, meal_type, OffsetDateTime::now_utc())?;
    log.version += 1;
    store.put_daily_log(&log).await?;

    tracing::debug!(
        %user_id,
        food = %food.name,
        entries = log.entries.len(),
        "food added to daily log"
    );
    Ok(log)
}

/// The newest entries of the user's most recent log, newest first.
pub async fn recent_meals(store: &dyn DataSource, user_id: Uuid) -> Result<Vec<RecentMeal>, Error> {
    let Some(log) = store.get_latest_log(user_id).await? else {
        return Ok(Vec::new());
    };
    Ok(log
        .entries
        .iter()
        .rev()
        .take(RECENT_MEALS_LIMIT)
        .map(|e| RecentMeal {
            name: e.name.clone(),
            calories: e.calories,
        })
        .collect())
}
