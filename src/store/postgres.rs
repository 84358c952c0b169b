use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

use crate::domain::{
    AllergenSensitivity, DailyLog, FoodItem, LogEntry, NutritionGoals, TotalNutrition, UserProfile,
};
use crate::error::Error;
use crate::store::{DataSource, SEARCH_LIMIT};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct FoodRow {
    id: Uuid,
    name: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    allergens: Vec<String>,
}

impl From<FoodRow> for FoodItem {
    fn from(r: FoodRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            calories: r.calories,
            protein: r.protein,
            carbs: r.carbs,
            fat: r.fat,
            allergens: r.allergens,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    allergens: Json<Vec<AllergenSensitivity>>,
    goals: Json<NutritionGoals>,
}

impl From<ProfileRow> for UserProfile {
    fn from(r: ProfileRow) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            allergens: r.allergens.0,
            goals: r.goals.0,
        }
    }
}

#[derive(Debug, FromRow)]
struct LogRow {
    user_id: Uuid,
    date: Date,
    entries: Json<Vec<LogEntry>>,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    water: f64,
    version: i64,
}

impl From<LogRow> for DailyLog {
    fn from(r: LogRow) -> Self {
        Self {
            user_id: r.user_id,
            date: r.date,
            entries: r.entries.0,
            totals: TotalNutrition {
                calories: r.calories,
                protein: r.protein,
                carbs: r.carbs,
                fat: r.fat,
                water: r.water,
            },
            version: r.version,
        }
    }
}

#[async_trait]
impl DataSource for PgStore {
    async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, Error> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, first_name, last_name, email, allergens, goals
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserProfile::from))
    }

    async fn get_food_item(&self, food_id: Uuid) -> Result<Option<FoodItem>, Error> {
        let row = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, name, calories, protein, carbs, fat, allergens
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(food_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(FoodItem::from))
    }

    async fn search_food_items(&self, query: &str) -> Result<Vec<FoodItem>, Error> {
        let rows = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, name, calories, protein, carbs, fat, allergens
            FROM foods
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FoodItem::from).collect())
    }

    async fn get_daily_log(&self, user_id: Uuid, date: Date) -> Result<Option<DailyLog>, Error> {
        let row = sqlx::query_as::<_, LogRow>(
            r#"
            SELECT user_id, date, entries, calories, protein, carbs, fat, water, version
            FROM daily_logs
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DailyLog::from))
    }

    async fn get_latest_log(&self, user_id: Uuid) -> Result<Option<DailyLog>, Error> {
        let row = sqlx::query_as::<_, LogRow>(
            r#"
            SELECT user_id, date, entries, calories, protein, carbs, fat, water, version
            FROM daily_logs
            WHERE user_id = $1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DailyLog::from))
    }

    async fn put_daily_log(&self, log: &DailyLog) -> Result<(), Error> {
        // Conditional upsert: the update only lands when the stored version
        // is exactly one behind the incoming one, so a lost race shows up
        // as zero affected rows instead of a silently dropped entry.
        let result = sqlx::query(
            r#"
            INSERT INTO daily_logs (user_id, date, entries, calories, protein, carbs, fat, water, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id, date) DO UPDATE
            SET entries = EXCLUDED.entries,
                calories = EXCLUDED.calories,
                protein = EXCLUDED.protein,
                carbs = EXCLUDED.carbs,
                fat = EXCLUDED.fat,
                water = EXCLUDED.water,
                version = EXCLUDED.version
            WHERE daily_logs.version = EXCLUDED.version - 1
            "#,
        )
        .bind(log.user_id)
        .bind(log.date)
        .bind(Json(&log.entries))
        .bind(log.totals.calories)
        .bind(log.totals.protein)
        .bind(log.totals.carbs)
        .bind(log.totals.fat)
        .bind(log.totals.water)
        .bind(log.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::Conflict);
        }
        Ok(())
    }
}
