use std::collections::HashMap;

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;
use uuid::{uuid, Uuid};

use crate::domain::{
    AllergenSensitivity, DailyLog, FoodItem, NutritionGoals, Severity, UserProfile,
};
use crate::error::Error;
use crate::store::{DataSource, SEARCH_LIMIT};

/// In-memory data source for development and tests. Seeded with a small
/// catalog and one demo profile; logs live behind an `RwLock` with the
/// same version-compare write semantics as the Postgres store.
pub struct FixtureStore {
    foods: Vec<FoodItem>,
    profiles: Vec<UserProfile>,
    logs: RwLock<HashMap<(Uuid, Date), DailyLog>>,
}

pub const DEMO_USER: Uuid = uuid!("8d6d2c7a-51b2-4f0e-9c55-111111111111");
pub const GREEK_YOGURT: Uuid = uuid!("40f7f0d2-0d3e-4b7e-8a11-222222222222");
pub const CHICKEN_BREAST: Uuid = uuid!("40f7f0d2-0d3e-4b7e-8a11-333333333333");
pub const ALMOND_BUTTER: Uuid = uuid!("40f7f0d2-0d3e-4b7e-8a11-444444444444");
pub const AVOCADO_TOAST: Uuid = uuid!("40f7f0d2-0d3e-4b7e-8a11-555555555555");

fn food(id: Uuid, name: &str, calories: f64, protein: f64, carbs: f64, fat: f64, allergens: &[&str]) -> FoodItem {
    FoodItem {
        id,
        name: name.to_string(),
        calories,
        protein,
        carbs,
        fat,
        allergens: allergens.iter().map(|a| a.to_string()).collect(),
    }
}

impl FixtureStore {
    pub fn empty() -> Self {
        Self {
            foods: Vec::new(),
            profiles: Vec::new(),
            logs: RwLock::new(HashMap::new()),
        }
    }

    pub fn seeded() -> Self {
        Self::empty()
            .with_food(food(GREEK_YOGURT, "Greek Yogurt", 100.0, 10.0, 5.0, 3.0, &["dairy"]))
            .with_food(food(CHICKEN_BREAST, "Chicken Breast", 165.0, 31.0, 0.0, 3.6, &[]))
            .with_food(food(ALMOND_BUTTER, "Almond Butter", 200.0, 7.0, 6.0, 18.0, &["nuts"]))
            .with_food(food(AVOCADO_TOAST, "Avocado Toast", 290.0, 8.0, 30.0, 15.0, &["gluten"]))
            .with_profile(UserProfile {
                id: DEMO_USER,
                first_name: "John".into(),
                last_name: "Doe".into(),
                email: "john.doe@example.com".into(),
                allergens: vec![
                    AllergenSensitivity { name: "Peanuts".into(), severity: Severity::High },
                    AllergenSensitivity { name: "Shellfish".into(), severity: Severity::High },
                ],
                goals: NutritionGoals::default(),
            })
    }

    pub fn with_food(mut self, food: FoodItem) -> Self {
        self.foods.push(food);
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profiles.push(profile);
        self
    }
}

#[async_trait]
impl DataSource for FixtureStore {
    async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, Error> {
        Ok(self.profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn get_food_item(&self, food_id: Uuid) -> Result<Option<FoodItem>, Error> {
        Ok(self.foods.iter().find(|f| f.id == food_id).cloned())
    }

    async fn search_food_items(&self, query: &str) -> Result<Vec<FoodItem>, Error> {
        let needle = query.to_lowercase();
        Ok(self
            .foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .take(SEARCH_LIMIT as usize)
            .cloned()
            .collect())
    }

    async fn get_daily_log(&self, user_id: Uuid, date: Date) -> Result<Option<DailyLog>, Error> {
        Ok(self.logs.read().await.get(&(user_id, date)).cloned())
    }

    async fn get_latest_log(&self, user_id: Uuid) -> Result<Option<DailyLog>, Error> {
        let logs = self.logs.read().await;
        Ok(logs
            .values()
            .filter(|l| l.user_id == user_id)
            .max_by_key(|l| l.date)
            .cloned())
    }

    async fn put_daily_log(&self, log: &DailyLog) -> Result<(), Error> {
        let mut logs = self.logs.write().await;
        if let Some(existing) = logs.get(&(log.user_id, log.date)) {
            if existing.version != log.version - 1 {
                return Err(Error::Conflict);
            }
        }
        logs.insert((log.user_id, log.date), log.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = FixtureStore::seeded();
        let hits = store.search_food_items("yog").await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Greek Yogurt");

        let hits = store.search_food_items("CHICK").await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Chicken Breast");

        let hits = store.search_food_items("toast").await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, AVOCADO_TOAST);

        let hits = store.search_food_items("pizza").await.expect("search");
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn put_rejects_stale_version() {
        let store = FixtureStore::seeded();
        let date = date!(2024 - 03 - 01);

        let mut log = DailyLog::empty(DEMO_USER, date);
        log.version = 1;
        store.put_daily_log(&log).await.expect("first write");

        // Same version again: a writer that read before the first write landed.
        let stale = log.clone();
        assert!(matches!(
            store.put_daily_log(&stale).await,
            Err(Error::Conflict)
        ));

        log.version = 2;
        store.put_daily_log(&log).await.expect("sequenced write");
    }

    #[tokio::test]
    async fn latest_log_picks_newest_date() {
        let store = FixtureStore::seeded();
        for (day, version) in [(date!(2024 - 03 - 01), 1), (date!(2024 - 03 - 05), 1)] {
            let mut log = DailyLog::empty(DEMO_USER, day);
            log.version = version;
            store.put_daily_log(&log).await.expect("write");
        }

        let latest = store
            .get_latest_log(DEMO_USER)
            .await
            .expect("query")
            .expect("log exists");
        assert_eq!(latest.date, date!(2024 - 03 - 05));
    }

    #[tokio::test]
    async fn seeded_profile_is_visible() {
        let store = FixtureStore::seeded();
        let profile = store
            .get_user_profile(DEMO_USER)
            .await
            .expect("query")
            .expect("profile exists");
        assert_eq!(profile.allergens.len(), 2);
        assert!(store
            .get_user_profile(Uuid::new_v4())
            .await
            .expect("query")
            .is_none());
    }
}
