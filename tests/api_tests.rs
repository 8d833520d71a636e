// tests/api_tests.rs

use backend::{config::Config, routes, state::AppState, utils::auth::hash_password};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // Note: For Postgres, you must have a running database.
    // We'll read from DATABASE_URL environment variable.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    // 1. Create a pool
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    // 2. Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    // 3. Create test configuration and state
    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        port: 0,
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
    };

    let state = AppState { pool, config };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn test_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test DB")
}

fn unique_email() -> String {
    format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

/// Seeds an admin user directly and returns a bearer token for it.
async fn admin_token(address: &str, pool: &PgPool) -> String {
    let email = unique_email();
    let password = "password123";
    let hashed = hash_password(password).unwrap();

    sqlx::query(
        "INSERT INTO users (name, email, password, role) VALUES ('Test Admin', $1, $2, 'admin')",
    )
    .bind(&email)
    .bind(&hashed)
    .execute(pool)
    .await
    .unwrap();

    let client = reqwest::Client::new();
    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .unwrap();

    login["token"].as_str().expect("Token not found").to_string()
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Test Student",
            "email": unique_email(),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["role"], "student");
    // Password hash must never leak
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: Send a malformed email
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Test Student",
            "email": "not-an-email",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let payload = serde_json::json!({
        "name": "Twin",
        "email": unique_email(),
        "password": "password123"
    });

    let first = client
        .post(format!("{}/api/auth/register", address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(format!("{}/api/auth/register", address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let email = unique_email();

    client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Test Student",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn admin_routes_reject_students_and_anonymous() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Anonymous: 401
    let response = client
        .get(format!("{}/api/admin/stats", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // Student token: 403
    let register: serde_json::Value = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Student",
            "email": unique_email(),
            "password": "password123"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = register["token"].as_str().unwrap();

    let response = client
        .get(format!("{}/api/admin/stats", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn admin_stats_works() {
    let address = spawn_app().await;
    let pool = test_pool().await;
    let token = admin_token(&address, &pool).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/admin/stats", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let stats: serde_json::Value = response.json().await.unwrap();
    assert!(stats["questions"].as_i64().is_some());
    assert!(stats["students"].as_i64().is_some());
}

#[tokio::test]
async fn upload_rejects_malformed_questions() {
    let address = spawn_app().await;
    let pool = test_pool().await;
    let token = admin_token(&address, &pool).await;
    let client = reqwest::Client::new();

    // Empty batch
    let response = client
        .post(format!("{}/api/admin/upload-questions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "questions": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // correct_index out of range
    let response = client
        .post(format!("{}/api/admin/upload-questions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "questions": [{
                "text": "Broken?",
                "options": ["a", "b"],
                "correct_index": 2
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Too few options
    let response = client
        .post(format!("{}/api/admin/upload-questions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "questions": [{
                "text": "Broken?",
                "options": ["only one"],
                "correct_index": 0
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
