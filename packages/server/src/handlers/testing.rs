//! In-memory collaborators for handler unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::storage::{BoxReader, DestroyResult, MediaKind, MediaStore, StorageError, StoredMedia};
use serde_json::json;
use uuid::Uuid;

use crate::entity::{actor, movie};

pub struct FakeMediaStore {
    answer: DestroyResult,
    uploads: AtomicUsize,
    destroyed: Mutex<Vec<String>>,
}

impl Default for FakeMediaStore {
    fn default() -> Self {
        Self::answering(DestroyResult::Ok)
    }
}

impl FakeMediaStore {
    pub fn answering(answer: DestroyResult) -> Self {
        Self {
            answer,
            uploads: AtomicUsize::new(0),
            destroyed: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(
        &self,
        _data: &[u8],
        filename: &str,
        kind: MediaKind,
    ) -> Result<StoredMedia, StorageError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        let public_id = format!("{}/{n}-{filename}", kind.folder());
        Ok(StoredMedia {
            url: self.url_for(&public_id),
            public_id,
        })
    }

    async fn destroy(
        &self,
        public_id: &str,
        _kind: MediaKind,
    ) -> Result<DestroyResult, StorageError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(self.answer)
    }

    async fn open(&self, public_id: &str) -> Result<BoxReader, StorageError> {
        Err(StorageError::NotFound(public_id.to_string()))
    }

    fn url_for(&self, public_id: &str) -> String {
        format!("http://media.test/{public_id}")
    }
}

pub fn actor_model(name: &str, avatar: Option<&str>) -> actor::Model {
    let now = Utc::now();
    actor::Model {
        id: Uuid::now_v7(),
        name: name.to_string(),
        about: format!("About {name}"),
        gender: "male".into(),
        avatar_public_id: avatar.map(str::to_string),
        avatar_url: avatar.map(|id| format!("http://media.test/{id}")),
        created_at: now,
        updated_at: now,
    }
}

pub fn movie_model(title: &str, poster: Option<&str>, trailer: &str) -> movie::Model {
    let now = Utc::now();
    movie::Model {
        id: Uuid::now_v7(),
        title: title.to_string(),
        story_line: format!("The story of {title}"),
        director: None,
        release_date: NaiveDate::from_ymd_opt(1994, 7, 6).unwrap(),
        status: "public".into(),
        kind: "Film".into(),
        language: "English".into(),
        genres: json!(["Drama"]),
        tags: json!(["classic"]),
        cast: json!([]),
        writers: json!([]),
        poster_public_id: poster.map(str::to_string),
        poster_url: poster.map(|id| format!("http://media.test/{id}")),
        trailer_public_id: trailer.to_string(),
        trailer_url: format!("http://media.test/{trailer}"),
        created_at: now,
        updated_at: now,
    }
}
