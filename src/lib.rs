pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::{connect, FitnessStore};
