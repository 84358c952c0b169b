use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::domain::{DailyLog, FoodItem, UserProfile};
use crate::error::Error;

mod fixture;
mod postgres;

pub use fixture::{
    FixtureStore, ALMOND_BUTTER, AVOCADO_TOAST, CHICKEN_BREAST, DEMO_USER, GREEK_YOGURT,
};
pub use postgres::PgStore;

/// Maximum rows a food search returns.
pub const SEARCH_LIMIT: i64 = 10;

/// Persistence capability consumed by the core. Selected once at startup;
/// handlers and services never know which implementation they talk to.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, Error>;

    async fn get_food_item(&self, food_id: Uuid) -> Result<Option<FoodItem>, Error>;

    /// Case-insensitive substring match over food names, bounded by
    /// [`SEARCH_LIMIT`].
    async fn search_food_items(&self, query: &str) -> Result<Vec<FoodItem>, Error>;

    async fn get_daily_log(&self, user_id: Uuid, date: Date) -> Result<Option<DailyLog>, Error>;

    /// The user's most recent log by calendar date, if any.
    async fn get_latest_log(&self, user_id: Uuid) -> Result<Option<DailyLog>, Error>;

    /// Writes a log, comparing `log.version` against the stored version.
    /// A write that lost a concurrent race fails with [`Error::Conflict`]
    /// and leaves the stored log untouched; retrying is the caller's call.
    async fn put_daily_log(&self, log: &DailyLog) -> Result<(), Error>;
}
