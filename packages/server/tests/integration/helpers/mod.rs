use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::config::StorageAppConfig;
use common::storage::filesystem::FilesystemMediaStore;
use common::storage::{MediaKind, MediaStore, StoredMedia};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

use server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use server::entity::{actor, movie, user};
use server::state::AppState;
use server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const ACTOR_CREATE: &str = "/api/actor/create";
    pub const ACTOR_SEARCH: &str = "/api/actor/search";
    pub const ACTOR_LIST: &str = "/api/actor/actors";
    pub const ACTOR_LATEST: &str = "/api/actor/latest-uploads";

    pub const MOVIE_UPLOAD_TRAILER: &str = "/api/movie/upload-trailer";
    pub const MOVIE_CREATE: &str = "/api/movie/create";
    pub const MOVIE_LIST: &str = "/api/movie/movies";
    pub const MOVIE_LATEST: &str = "/api/movie/latest-uploads";

    pub const USER_CREATE: &str = "/api/user/create";
    pub const USER_SIGN_IN: &str = "/api/user/sign-in";
    pub const USER_IS_AUTH: &str = "/api/user/is-auth";

    pub fn actor_update(id: &str) -> String {
        format!("/api/actor/update/{id}")
    }

    pub fn actor(id: &str) -> String {
        format!("/api/actor/{id}")
    }

    pub fn actor_single(id: &str) -> String {
        format!("/api/actor/single/{id}")
    }

    pub fn movie(id: &str) -> String {
        format!("/api/movie/{id}")
    }

    pub fn movie_single(id: &str) -> String {
        format!("/api/movie/single/{id}")
    }

    pub fn movie_for_update(id: &str) -> String {
        format!("/api/movie/for-update/{id}")
    }

    pub fn media(public_id: &str) -> String {
        format!("/media/{public_id}")
    }
}

/// A running test server backed by a mock database and a throwaway media directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub media: Arc<dyn MediaStore>,
    media_root: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Spawn with a database that answers no queries.
    pub async fn spawn() -> Self {
        Self::spawn_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection()).await
    }

    pub async fn spawn_with(db: DatabaseConnection) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        let dir = tempfile::tempdir().expect("Failed to create media dir");
        let media_root = dir.path().join("media");
        let public_url = format!("http://{addr}/media");
        let max_upload_size = 2 * 1024 * 1024;
        let media: Arc<dyn MediaStore> = Arc::new(
            FilesystemMediaStore::new(media_root.clone(), &public_url, max_upload_size)
                .await
                .expect("Failed to create media store"),
        );

        let mut storage = StorageAppConfig::default();
        storage.public_url = public_url;
        storage.max_upload_size = max_upload_size;
        storage.filesystem.root = media_root.clone();

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                token_ttl_days: 1,
                admin: None,
            },
            storage,
        };

        let state = AppState {
            db,
            media: media.clone(),
            config: Arc::new(config),
        };
        let app = server::build_router(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            media,
            media_root,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn media_path(&self, public_id: &str) -> PathBuf {
        self.media_root.join(public_id)
    }

    /// Number of stored objects in one media folder.
    pub fn media_count(&self, kind: MediaKind) -> usize {
        count_files(&self.media_root.join(kind.folder()))
    }

    /// Write an object straight into the media directory, bypassing the API.
    pub fn put(&self, media: &StoredMedia) {
        let path = self.media_path(&media.public_id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"stored-bytes").unwrap();
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        TestResponse::from_response(req.send().await.expect("Failed to send GET request")).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(res).await
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        TestResponse::from_response(req.send().await.expect("Failed to send POST request")).await
    }

    pub async fn post_form(&self, path: &str, form: Form, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart POST request");
        TestResponse::from_response(res).await
    }

    pub async fn patch_form(&self, path: &str, form: Form, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart PATCH request");
        TestResponse::from_response(res).await
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

pub fn admin_token() -> String {
    jwt::sign(&Uuid::now_v7().to_string(), "admin", JWT_SECRET, 1).unwrap()
}

pub fn user_token(id: Uuid) -> String {
    jwt::sign(&id.to_string(), "user", JWT_SECRET, 1).unwrap()
}

pub fn file_part(filename: &str, mime: &str, data: &[u8]) -> Part {
    Part::bytes(data.to_vec())
        .file_name(filename.to_string())
        .mime_str(mime)
        .unwrap()
}

pub fn actor_form(name: &str) -> Form {
    Form::new()
        .text("name", name.to_string())
        .text("about", "Two-time Academy Award winner")
        .text("gender", "male")
}

pub fn movie_form(title: &str, trailer: &StoredMedia) -> Form {
    Form::new()
        .text("title", title.to_string())
        .text("storyLine", "Life is like a box of chocolates.")
        .text("releaseDate", "1994-07-06")
        .text("status", "public")
        .text("type", "Film")
        .text("language", "English")
        .text("genres", json!(["Drama", "Romance"]).to_string())
        .text("tags", json!(["classic"]).to_string())
        .text("trailer", serde_json::to_string(trailer).unwrap())
}

/// A media reference as it would be stored on a row.
pub fn media_ref(public_id: &str) -> StoredMedia {
    StoredMedia {
        public_id: public_id.to_string(),
        url: format!("http://media.test/{public_id}"),
    }
}

pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

pub fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

pub fn actor_row(name: &str, avatar: Option<&StoredMedia>) -> actor::Model {
    let now = Utc::now();
    actor::Model {
        id: Uuid::now_v7(),
        name: name.to_string(),
        about: "Two-time Academy Award winner".into(),
        gender: "male".into(),
        avatar_public_id: avatar.map(|a| a.public_id.clone()),
        avatar_url: avatar.map(|a| a.url.clone()),
        created_at: now,
        updated_at: now,
    }
}

pub fn movie_row(title: &str, poster: Option<&StoredMedia>, trailer: &StoredMedia) -> movie::Model {
    let now = Utc::now();
    movie::Model {
        id: Uuid::now_v7(),
        title: title.to_string(),
        story_line: "Life is like a box of chocolates.".into(),
        director: None,
        release_date: NaiveDate::from_ymd_opt(1994, 7, 6).unwrap(),
        status: "public".into(),
        kind: "Film".into(),
        language: "English".into(),
        genres: json!(["Drama", "Romance"]),
        tags: json!(["classic"]),
        cast: json!([]),
        writers: json!([]),
        poster_public_id: poster.map(|p| p.public_id.clone()),
        poster_url: poster.map(|p| p.url.clone()),
        trailer_public_id: trailer.public_id.clone(),
        trailer_url: trailer.url.clone(),
        created_at: now,
        updated_at: now,
    }
}

pub fn user_row(email: &str, password: &str, role: &str) -> user::Model {
    user::Model {
        id: Uuid::now_v7(),
        name: "Jane".into(),
        email: email.to_string(),
        password: server::utils::hash::hash_password(password).unwrap(),
        role: role.to_string(),
        created_at: Utc::now(),
    }
}
