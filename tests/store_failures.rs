use async_trait::async_trait;
use fitness_tracker::config::{AppConfig, StoreConfig};
use fitness_tracker::errors::StoreError;
use fitness_tracker::models::Entry;
use fitness_tracker::{router, AppState, FitnessStore};
use reqwest::{header, redirect, Client, Response, StatusCode};
use std::path::PathBuf;
use std::sync::Arc;

/// A store whose every call fails, as if the database went away.
struct UnavailableStore;

#[async_trait]
impl FitnessStore for UnavailableStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn fetch_goal(&self) -> Result<Option<i64>, StoreError> {
        Err(StoreError::CorruptGoal("x".into()))
    }

    async fn fetch_recent_entries(&self, _limit: u32) -> Result<Vec<Entry>, StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn insert_entry(&self, _entry: &Entry) -> Result<(), StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn replace_goal(&self, _value: i64) -> Result<(), StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(sqlx::Error::PoolClosed.into())
    }
}

/// Serves the router over an unavailable store on a random local port.
async fn spawn_app() -> String {
    let config = AppConfig {
        port: 0,
        store: StoreConfig::Sqlite {
            path: PathBuf::from("unused.db"),
        },
        secret_key: "store-failure-key".into(),
    };
    let state = AppState::new(&config, Arc::new(UnavailableStore)).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{addr}")
}

fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

/// Asserts the post redirected home and returns the flash cookie pair.
fn flash_cookie(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn page_and_api_report_database_error() {
    let base_url = spawn_app().await;
    let client = client();

    for path in ["/", "/api/dashboard"] {
        let response = client.get(format!("{base_url}{path}")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.text().await.unwrap(),
            "Database error: stored calorie goal \"x\" is not an integer"
        );
    }
}

#[tokio::test]
async fn health_reports_db_error() {
    let base_url = spawn_app().await;

    let response = client().get(format!("{base_url}/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "DB error");
}

#[tokio::test]
async fn add_entry_failure_redirects_with_error_flash() {
    let base_url = spawn_app().await;
    let client = client();

    let response = client
        .post(format!("{base_url}/add"))
        .form(&[("date", "2024-01-01"), ("calories", "1800")])
        .send()
        .await
        .unwrap();
    let cookie = flash_cookie(&response);
    assert!(cookie.starts_with("flash="));
    assert!(cookie.contains("error%3AError%20adding%20entry%3A%20"));
}

#[tokio::test]
async fn set_goal_failure_redirects_with_error_flash() {
    let base_url = spawn_app().await;
    let client = client();

    let response = client
        .post(format!("{base_url}/set_goal"))
        .form(&[("calorie_goal", "2000")])
        .send()
        .await
        .unwrap();
    let cookie = flash_cookie(&response);
    assert!(cookie.starts_with("flash="));
    assert!(cookie.contains("error%3AError%20updating%20goal%3A%20"));
}

#[tokio::test]
async fn validation_runs_before_the_store() {
    let base_url = spawn_app().await;
    let client = client();

    let response = client
        .post(format!("{base_url}/add"))
        .form(&[("date", "")])
        .send()
        .await
        .unwrap();
    let cookie = flash_cookie(&response);
    assert!(cookie.starts_with("flash="));
    assert!(cookie.contains("error%3ADate%20is%20required."));
}
