use time::Date;
use uuid::Uuid;

use crate::domain::{AllergenAlert, AllergenSensitivity, LogEntry};
use crate::error::Error;
use crate::store::DataSource;

/// Alerts for one log entry, in the food's own allergen-list order.
///
/// Catalog and profile data disagree on casing ("Peanuts" vs "peanuts"),
/// so names compare case-insensitively; the alert carries the user's own
/// spelling and the severity they assigned to it.
pub fn entry_alerts(
    sensitivities: &[AllergenSensitivity],
    entry: &LogEntry,
    food_allergens: &[String],
) -> Vec<AllergenAlert> {
    food_allergens
        .iter()
        .filter_map(|allergen| {
            sensitivities
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(allergen))
                .map(|s| AllergenAlert {
                    allergen: s.name.clone(),
                    severity: s.severity,
                    detected_in: entry.name.clone(),
                })
        })
        .collect()
}

/// Cross-references the day's log against the user's sensitivities.
///
/// Allergen data is re-resolved from the current catalog on every query
/// (unlike nutrition, which is snapshotted at log time): an entry whose
/// food has since left the catalog simply contributes no alerts. Alerts
/// come back in log order, then allergen-list order within an entry.
pub async fn compute_alerts(
    store: &dyn DataSource,
    user_id: Uuid,
    date: Date,
) -> Result<Vec<AllergenAlert>, Error> {
    let Some(profile) = store.get_user_profile(user_id).await? else {
        return Ok(Vec::new());
    };
    if profile.allergens.is_empty() {
        return Ok(Vec::new());
    }
    let Some(log) = store.get_daily_log(user_id, date).await? else {
        return Ok(Vec::new());
    };

    let mut alerts = Vec::new();
    for entry in &log.entries {
        let Some(food) = store.get_food_item(entry.food_id).await? else {
            continue;
        };
        alerts.extend(entry_alerts(&profile.allergens, entry, &food.allergens));
    }
    Ok(alerts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DailyLog, FoodItem, MealType, NutritionGoals, Severity, UserProfile,
    };
    use crate::logs::services::add_food_to_log;
    use crate::store::{FixtureStore, ALMOND_BUTTER, CHICKEN_BREAST, DEMO_USER, GREEK_YOGURT};
    use time::macros::date;
    use time::OffsetDateTime;

    fn profile(sensitivities: &[(&str, Severity)]) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            first_name: "Test".into(),
            last_name: "User".into(),
            email: "test@example.com".into(),
            allergens: sensitivities
                .iter()
                .map(|(name, severity)| AllergenSensitivity {
                    name: name.to_string(),
                    severity: *severity,
                })
                .collect(),
            goals: NutritionGoals::default(),
        }
    }

    fn entry(name: &str) -> LogEntry {
        LogEntry {
            food_id: Uuid::new_v4(),
            name: name.into(),
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            serving_size: 1.0,
            meal_type: MealType::Snack,
            logged_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn alert_order_follows_food_allergen_list() {
        let user = profile(&[("gluten", Severity::Medium), ("nuts", Severity::High)]);
        let allergens = vec!["nuts".to_string(), "gluten".to_string()];
        let alerts = entry_alerts(&user.allergens, &entry("Trail Mix Bar"), &allergens);

        let names: Vec<_> = alerts.iter().map(|a| a.allergen.as_str()).collect();
        assert_eq!(names, ["nuts", "gluten"]);
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[0].detected_in, "Trail Mix Bar");
    }

    #[test]
    fn matching_ignores_case() {
        let user = profile(&[("Peanuts", Severity::High)]);
        let alerts = entry_alerts(
            &user.allergens,
            &entry("Satay Sauce"),
            &["peanuts".to_string()],
        );
        assert_eq!(alerts.len(), 1);
        // The user's own spelling wins.
        assert_eq!(alerts[0].allergen, "Peanuts");
    }

    #[tokio::test]
    async fn single_match_produces_single_alert() {
        // User sensitive to nuts; Almond Butter carries {nuts} and the
        // other logged food carries {gluten} only.
        let user = profile(&[("nuts", Severity::High)]);
        let user_id = user.id;
        let store = FixtureStore::seeded().with_profile(user);
        let date = date!(2024 - 03 - 01);

        add_food_to_log(&store, user_id, date, ALMOND_BUTTER, 1.0, MealType::Snack)
            .await
            .expect("add");
        add_food_to_log(&store, user_id, date, CHICKEN_BREAST, 1.0, MealType::Dinner)
            .await
            .expect("add");

        let alerts = compute_alerts(&store, user_id, date).await.expect("alerts");
        assert_eq!(
            alerts,
            vec![AllergenAlert {
                allergen: "nuts".into(),
                severity: Severity::High,
                detected_in: "Almond Butter".into(),
            }]
        );
    }

    #[tokio::test]
    async fn no_sensitivities_means_no_alerts() {
        let user = profile(&[]);
        let user_id = user.id;
        let store = FixtureStore::seeded().with_profile(user);
        let date = date!(2024 - 03 - 01);

        add_food_to_log(&store, user_id, date, ALMOND_BUTTER, 1.0, MealType::Snack)
            .await
            .expect("add");

        let alerts = compute_alerts(&store, user_id, date).await.expect("alerts");
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn empty_log_means_no_alerts() {
        let store = FixtureStore::seeded();
        let alerts = compute_alerts(&store, DEMO_USER, date!(2024 - 03 - 01))
            .await
            .expect("alerts");
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn alerts_follow_log_order() {
        let user = profile(&[("dairy", Severity::Medium), ("nuts", Severity::High)]);
        let user_id = user.id;
        let store = FixtureStore::seeded().with_profile(user);
        let date = date!(2024 - 03 - 01);

        add_food_to_log(&store, user_id, date, ALMOND_BUTTER, 1.0, MealType::Breakfast)
            .await
            .expect("add");
        add_food_to_log(&store, user_id, date, GREEK_YOGURT, 1.0, MealType::Lunch)
            .await
            .expect("add");

        let alerts = compute_alerts(&store, user_id, date).await.expect("alerts");
        let detected: Vec<_> = alerts
            .iter()
            .map(|a| (a.allergen.as_str(), a.detected_in.as_str()))
            .collect();
        assert_eq!(
            detected,
            [("nuts", "Almond Butter"), ("dairy", "Greek Yogurt")]
        );
    }

    #[tokio::test]
    async fn entry_for_vanished_food_contributes_nothing() {
        let user = profile(&[("nuts", Severity::High)]);
        let user_id = user.id;
        let store = FixtureStore::seeded().with_profile(user);
        let date = date!(2024 - 03 - 01);

        // A historical entry whose food is no longer in the catalog.
        let ghost = FoodItem {
            id: Uuid::new_v4(),
            name: "Discontinued Nut Bar".into(),
            calories: 150.0,
            protein: 4.0,
            carbs: 12.0,
            fat: 9.0,
            allergens: vec!["nuts".into()],
        };
        let mut log = DailyLog::empty(user_id, date);
        crate::logs::services::append_entry(
            &mut log,
            &ghost,
            1.0,
            MealType::Snack,
            OffsetDateTime::now_utc(),
        )
        .expect("append");
        log.version = 1;
        store.put_daily_log(&log).await.expect("put");

        let alerts = compute_alerts(&store, user_id, date).await.expect("alerts");
        assert!(alerts.is_empty());
    }
}
