use std::net::SocketAddr;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tempfile::TempDir;

use server::config::{
    AppConfig, AuthConfig, ContentConfig, CorsConfig, DatabaseConfig, ServerConfig,
};
use server::state::AppState;

/// Admin password configured for every spawned test app.
pub const ADMIN_PASSWORD: &str = "pitlane-secret";

pub mod routes {
    pub const FORM: &str = "/api/v1/form";
    pub const SUBMISSIONS: &str = "/api/v1/submissions";
    pub const LEADERBOARD: &str = "/api/v1/leaderboard";
    pub const ADMIN_LOGIN: &str = "/api/v1/admin/login";
    pub const ADMIN_ME: &str = "/api/v1/admin/me";
    pub const ADMIN_SETTINGS: &str = "/api/v1/admin/settings";
    pub const RACES: &str = "/api/v1/races";
    pub const ACTIVE_RACES: &str = "/api/v1/races/active";

    pub fn race(id: i32) -> String {
        format!("/api/v1/races/{id}")
    }

    pub fn questions(race_id: i32) -> String {
        format!("/api/v1/races/{race_id}/questions")
    }

    pub fn question(race_id: i32, id: i32) -> String {
        format!("/api/v1/races/{race_id}/questions/{id}")
    }

    pub fn result(race_id: i32) -> String {
        format!("/api/v1/races/{race_id}/result")
    }

    pub fn race_submissions(race_id: i32) -> String {
        format!("/api/v1/races/{race_id}/submissions")
    }

    pub fn submissions_export(race_id: i32) -> String {
        format!("/api/v1/races/{race_id}/submissions/export")
    }

    pub fn stats(race_id: i32) -> String {
        format!("/api/v1/races/{race_id}/stats")
    }

    pub fn stats_export(race_id: i32) -> String {
        format!("/api/v1/races/{race_id}/stats/export")
    }
}

/// A running test server backed by a per-test SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: Option<DatabaseConnection>,
    _tmp: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// Content-Disposition header, when present.
    pub content_disposition: Option<String>,
    /// Content-Type header, when present.
    pub content_type: Option<String>,
}

fn base_config(tmp: &TempDir, db_url: Option<String>) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig::default(),
        },
        database: DatabaseConfig { url: db_url },
        auth: AuthConfig {
            admin_password: Some(ADMIN_PASSWORD.to_string()),
            jwt_secret: "test-secret-for-integration-tests".to_string(),
        },
        email: None,
        content: ContentConfig {
            description: None,
            settings_file: tmp.path().join("app_settings.json"),
            questions_file: tmp.path().join("questions.json"),
            questions: None,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a store, letting the caller adjust the config first.
    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let tmp = TempDir::new().expect("Failed to create tempdir");
        let db_path = tmp.path().join("gridpool-test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let mut config = base_config(&tmp, Some(db_url));
        customize(&mut config);
        Self::start(config, tmp).await
    }

    /// Spawn without a store: the form falls back through its layers and
    /// intake has no database sink.
    pub async fn spawn_without_db() -> Self {
        Self::spawn_without_db_with(|_| {}).await
    }

    pub async fn spawn_without_db_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let tmp = TempDir::new().expect("Failed to create tempdir");
        let mut config = base_config(&tmp, None);
        customize(&mut config);
        Self::start(config, tmp).await
    }

    async fn start(config: AppConfig, tmp: TempDir) -> Self {
        let db = match config.database.url.as_deref() {
            Some(url) => {
                let db = server::database::init_db(url)
                    .await
                    .expect("Failed to initialize test database");
                server::seed::ensure_indexes(&db)
                    .await
                    .expect("Failed to ensure indexes");
                Some(db)
            }
            None => None,
        };

        let state = AppState {
            db: db.clone(),
            mailer: None,
            config,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");
        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");
        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }

    /// Log in as admin and return the token.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post(routes::ADMIN_LOGIN, &json!({"password": ADMIN_PASSWORD}))
            .await;
        assert_eq!(res.status, 200, "Admin login failed: {}", res.text);
        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create an active race via the API and return its `id`.
    pub async fn create_race(&self, token: &str, name: &str) -> i32 {
        let res = self
            .post_with_token(
                routes::RACES,
                &json!({
                    "name": name,
                    "race_date": "2025-06-01",
                    "submission_deadline": "2099-01-01T12:00:00Z",
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_race failed: {}", res.text);
        res.id()
    }

    /// Create an extra question via the API and return its `id`.
    pub async fn create_question(
        &self,
        token: &str,
        race_id: i32,
        question: &str,
        options: &[&str],
    ) -> i32 {
        let res = self
            .post_with_token(
                &routes::questions(race_id),
                &json!({"question": question, "options": options}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_question failed: {}", res.text);
        res.id()
    }

    /// Submit predictions via the API.
    pub async fn submit(&self, body: &Value) -> TestResponse {
        let res = self.post(routes::SUBMISSIONS, body).await;
        assert_eq!(res.status, 201, "submit failed: {}", res.text);
        res
    }

    /// Enter a race result via the API.
    pub async fn enter_result(&self, token: &str, race_id: i32, body: &Value) -> TestResponse {
        let res = self.put_with_token(&routes::result(race_id), body, token).await;
        assert!(
            res.status == 200 || res.status == 201,
            "enter_result failed: {}",
            res.text
        );
        res
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let content_disposition = res
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = res
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            content_disposition,
            content_type,
        }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}

/// A submission payload with every fixed field valid.
pub fn submission_body(user_name: &str, race_id: Option<i32>) -> Value {
    let mut body = json!({
        "user_name": user_name,
        "podium_1": "Max Verstappen",
        "podium_2": "Lando Norris",
        "podium_3": "Charles Leclerc",
        "time_diff": "Under 2 seconds",
        "driver_of_day": "Max Verstappen",
        "safety_car": "Yes",
        "red_flag": "No",
        "classified_drivers": "20",
        "teams_with_points": 7,
        "extra_answers": [],
    });
    if let Some(id) = race_id {
        body["race_id"] = json!(id);
    }
    body
}

/// A result payload matching `submission_body` on every category.
pub fn result_body() -> Value {
    json!({
        "podium_1": "Max Verstappen",
        "podium_2": "Lando Norris",
        "podium_3": "Charles Leclerc",
        "time_diff": "Under 2 seconds",
        "driver_of_day": "Max Verstappen",
        "safety_car": "Yes",
        "red_flag": "No",
        "classified_drivers": "20",
        "teams_with_points": 7,
        "extra_answers": [],
    })
}
