use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use once_cell::sync::Lazy;
use reqwest::{Client, Method, Response};
use secrecy::ExposeSecret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use uuid::Uuid;

use tournament_backend::config::settings::{get_config, get_jwt_settings, DatabaseSettings};
use tournament_backend::models::user::UserRole;
use tournament_backend::run;
use tournament_backend::telemetry::{get_subscriber, init_subscriber};
use tournament_backend::Claims;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub jwt_secret: String,
}

impl TestApp {
    /// Mint an access token the way the identity provider would.
    pub fn token_for(&self, role: UserRole) -> String {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: format!("{}{}", role, &Uuid::new_v4().to_string()[..8]),
            role,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .expect("Failed to encode token")
    }

    pub fn organizer_token(&self) -> String {
        self.token_for(UserRole::Organizer)
    }
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    // A fixed DATABASE_URL would point every test at the same database
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database).await;

    let jwt_settings = get_jwt_settings(&configuration);
    let jwt_secret = jwt_settings.secret.expose_secret().to_string();

    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
        configuration.application.allowed_origins,
    )
    .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        jwt_secret,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(config.connection_string_without_db().expose_secret())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

pub async fn make_authenticated_request(
    client: &Client,
    method: Method,
    url: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let mut request = client
        .request(method, url)
        .header("Authorization", format!("Bearer {}", token));

    if let Some(json_body) = body {
        request = request.json(&json_body);
    }

    request.send().await.expect("Failed to execute request")
}
