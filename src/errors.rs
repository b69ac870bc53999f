use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn store(err: StoreError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Database error: {err}"),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Startup configuration problems. These are fatal and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Missing DB config values: {}. Check DB_HOST, DB_USER, DB_PASSWORD, DB_NAME.",
        .0.join(", ")
    )]
    MissingDbValues(Vec<&'static str>),
    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),
    #[error("SECRET_KEY cannot be used as a signing key")]
    InvalidSecretKey,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("stored calorie goal {0:?} is not an integer")]
    CorruptGoal(String),
    #[error("stored weight {0:?} is not a number")]
    CorruptWeight(String),
}

/// Rejected form input. The display text is shown to the user as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Date is required.")]
    MissingDate,
    #[error("Date must be formatted as YYYY-MM-DD.")]
    InvalidDate,
    #[error("Weight must be a number.")]
    InvalidWeight,
    #[error("Calories must be a whole number.")]
    InvalidCalories,
    #[error("Steps must be a whole number.")]
    InvalidSteps,
    #[error("Calorie goal cannot be empty.")]
    MissingGoal,
    #[error("Calorie goal must be a whole number.")]
    InvalidGoal,
}
