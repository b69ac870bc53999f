use crate::config::{AppConfig, StoreConfig};
use crate::errors::StoreError;
use crate::models::Entry;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions},
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};
use std::{path::Path, sync::Arc};
use tracing::info;

/// Size of the history window shown on the page.
pub const RECENT_ENTRY_LIMIT: u32 = 30;

const GOAL_SETTING: &str = "calorie_goal";
const MAX_CONNECTIONS: u32 = 5;

// Statements both backends accept verbatim.
const SELECT_GOAL: &str = "SELECT value FROM settings WHERE name = ?";
const INSERT_ENTRY: &str =
    "INSERT INTO fitness_entries (entry_date, weight, calories, steps) VALUES (?, ?, ?, ?)";
const DELETE_GOAL: &str = "DELETE FROM settings WHERE name = ?";
const INSERT_GOAL: &str = "INSERT INTO settings (name, value) VALUES (?, ?)";
const PING: &str = "SELECT 1";

/// Durable home of entries and the calorie goal. Implementations hand back
/// rows already normalized into [`Entry`].
#[async_trait]
pub trait FitnessStore: Send + Sync {
    async fn init_schema(&self) -> Result<(), StoreError>;

    async fn fetch_goal(&self) -> Result<Option<i64>, StoreError>;

    /// Newest first, ties broken by insertion order.
    async fn fetch_recent_entries(&self, limit: u32) -> Result<Vec<Entry>, StoreError>;

    async fn insert_entry(&self, entry: &Entry) -> Result<(), StoreError>;

    /// Last write wins; earlier goals are discarded.
    async fn replace_goal(&self, value: i64) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Opens the backend named by the configuration and makes sure its tables exist.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn FitnessStore>, StoreError> {
    let store: Arc<dyn FitnessStore> = match &config.store {
        StoreConfig::Sqlite { path } => {
            info!(path = %path.display(), "using sqlite store");
            Arc::new(SqliteStore::open(path).await?)
        }
        StoreConfig::MySql {
            host,
            user,
            password,
            database,
        } => {
            info!(%host, %database, "using mysql store");
            let options = MySqlConnectOptions::new()
                .host(host)
                .username(user)
                .password(password)
                .database(database);
            Arc::new(MySqlStore::connect(options).await?)
        }
    };

    store.init_schema().await?;
    Ok(store)
}

fn parse_goal(raw: String) -> Result<i64, StoreError> {
    raw.trim().parse().map_err(|_| StoreError::CorruptGoal(raw))
}

/// MySQL hands `DECIMAL` weights back as text.
fn weight_from_text(raw: Option<String>) -> Result<Option<f64>, StoreError> {
    raw.map(|raw| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| StoreError::CorruptWeight(raw))
    })
    .transpose()
}

type EntryRow = (NaiveDate, Option<f64>, Option<i64>, Option<i64>);

fn entry_from_row((date, weight, calories, steps): EntryRow) -> Entry {
    Entry {
        date,
        weight,
        calories,
        steps,
    }
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl FitnessStore for SqliteStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fitness_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entry_date TEXT NOT NULL,
                weight REAL,
                calories INTEGER,
                steps INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_goal(&self) -> Result<Option<i64>, StoreError> {
        let raw: Option<String> = sqlx::query_scalar(SELECT_GOAL)
            .bind(GOAL_SETTING)
            .fetch_optional(&self.pool)
            .await?;
        raw.map(parse_goal).transpose()
    }

    async fn fetch_recent_entries(&self, limit: u32) -> Result<Vec<Entry>, StoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT entry_date, weight, calories, steps
            FROM fitness_entries
            ORDER BY entry_date DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    async fn insert_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        sqlx::query(INSERT_ENTRY)
            .bind(entry.date)
            .bind(entry.weight)
            .bind(entry.calories)
            .bind(entry.steps)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_goal(&self, value: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(DELETE_GOAL)
            .bind(GOAL_SETTING)
            .execute(&mut *tx)
            .await?;
        sqlx::query(INSERT_GOAL)
            .bind(GOAL_SETTING)
            .bind(value.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query(PING).execute(&self.pool).await?;
        Ok(())
    }
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(options: MySqlConnectOptions) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl FitnessStore for MySqlStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fitness_entries (
                id INT AUTO_INCREMENT PRIMARY KEY,
                entry_date DATE NOT NULL,
                weight DECIMAL(5,2),
                calories INT,
                steps INT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                id INT AUTO_INCREMENT PRIMARY KEY,
                name VARCHAR(255) UNIQUE NOT NULL,
                value VARCHAR(255) NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_goal(&self) -> Result<Option<i64>, StoreError> {
        let raw: Option<String> = sqlx::query_scalar(SELECT_GOAL)
            .bind(GOAL_SETTING)
            .fetch_optional(&self.pool)
            .await?;
        raw.map(parse_goal).transpose()
    }

    async fn fetch_recent_entries(&self, limit: u32) -> Result<Vec<Entry>, StoreError> {
        // DECIMAL and INT columns are widened to text and BIGINT so they decode
        // the same way as the sqlite rows.
        let rows: Vec<(NaiveDate, Option<String>, Option<i64>, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT entry_date,
                   CAST(weight AS CHAR),
                   CAST(calories AS SIGNED),
                   CAST(steps AS SIGNED)
            FROM fitness_entries
            ORDER BY entry_date DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(date, weight, calories, steps)| -> Result<Entry, StoreError> {
                let weight = weight_from_text(weight)?;
                Ok(entry_from_row((date, weight, calories, steps)))
            })
            .collect()
    }

    async fn insert_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        sqlx::query(INSERT_ENTRY)
            .bind(entry.date)
            .bind(entry.weight)
            .bind(entry.calories)
            .bind(entry.steps)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_goal(&self, value: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(DELETE_GOAL)
            .bind(GOAL_SETTING)
            .execute(&mut *tx)
            .await?;
        sqlx::query(INSERT_GOAL)
            .bind(GOAL_SETTING)
            .bind(value.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query(PING).execute(&self.pool).await?;
        Ok(())
    }
}
