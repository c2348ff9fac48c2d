use common::actor::MessageResponse;
use common::movie::{
    CastMember, CreateMovieResponse, MovieDetail, MovieListItem, MoviePage, MovieStatus,
};
use common::storage::StoredMedia;
use futures::stream::{self, StreamExt};
use reqwest::Body;
use reqwest::multipart::{Form, Part};

use super::Upload;
use crate::client::ApiClient;
use crate::error::ApiError;

/// Size of the slices a trailer is streamed in; progress is reported once per slice.
const UPLOAD_CHUNK: usize = 64 * 1024;

/// Whole-number upload percentage, `floor(loaded / total * 100)`.
pub fn progress_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = u128::from(loaded) * 100 / u128::from(total);
    percent.min(100) as u8
}

/// Fields of the movie create/update form.
#[derive(Debug, Clone)]
pub struct MovieForm {
    pub title: String,
    pub story_line: String,
    pub director: Option<String>,
    /// `YYYY-MM-DD`.
    pub release_date: String,
    pub status: MovieStatus,
    pub kind: String,
    pub language: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub cast: Vec<CastMember>,
    pub writers: Vec<String>,
    pub trailer: StoredMedia,
    pub poster: Option<Upload>,
}

impl MovieForm {
    fn into_multipart(self) -> Result<Form, ApiError> {
        let json = |value: serde_json::Result<String>| {
            value.map_err(|e| ApiError::new(format!("Could not encode form field: {e}")))
        };

        let mut form = Form::new()
            .text("title", self.title)
            .text("storyLine", self.story_line)
            .text("releaseDate", self.release_date)
            .text("status", self.status.as_str())
            .text("type", self.kind)
            .text("language", self.language)
            .text("genres", json(serde_json::to_string(&self.genres))?)
            .text("tags", json(serde_json::to_string(&self.tags))?)
            .text("cast", json(serde_json::to_string(&self.cast))?)
            .text("writers", json(serde_json::to_string(&self.writers))?)
            .text("trailer", json(serde_json::to_string(&self.trailer))?);

        if let Some(director) = self.director {
            form = form.text("director", director);
        }
        if let Some(poster) = self.poster {
            form = form.part("poster", poster.into_part()?);
        }
        Ok(form)
    }
}

impl ApiClient {
    /// Upload a trailer, calling `on_progress` with the percentage sent so far.
    pub async fn upload_trailer<F>(
        &self,
        video: Upload,
        on_progress: F,
    ) -> Result<StoredMedia, ApiError>
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        let total = video.bytes.len() as u64;
        let mime = mime_guess::from_path(&video.filename)
            .first_or_octet_stream()
            .to_string();

        let chunks: Vec<Vec<u8>> = video
            .bytes
            .chunks(UPLOAD_CHUNK)
            .map(<[u8]>::to_vec)
            .collect();
        let mut loaded = 0u64;
        let body = stream::iter(chunks).map(move |chunk| {
            loaded += chunk.len() as u64;
            on_progress(progress_percent(loaded, total));
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(video.filename)
            .mime_str(&mime)?;
        let request = self
            .client
            .post(self.url("/movie/upload-trailer"))
            .multipart(Form::new().part("video", part));

        self.send(self.authorized(request).await).await
    }

    pub async fn create_movie(&self, form: MovieForm) -> Result<CreateMovieResponse, ApiError> {
        let request = self
            .client
            .post(self.url("/movie/create"))
            .multipart(form.into_multipart()?);
        self.send(self.authorized(request).await).await
    }

    pub async fn update_movie(&self, id: &str, form: MovieForm) -> Result<MovieDetail, ApiError> {
        let request = self
            .client
            .patch(self.url(&format!("/movie/update/{id}")))
            .multipart(form.into_multipart()?);
        self.send(self.authorized(request).await).await
    }

    pub async fn delete_movie(&self, id: &str) -> Result<MessageResponse, ApiError> {
        let request = self.client.delete(self.url(&format!("/movie/{id}")));
        self.send(self.authorized(request).await).await
    }

    pub async fn get_movies(&self, page_no: u64, limit: u64) -> Result<MoviePage, ApiError> {
        let request = self
            .client
            .get(self.url("/movie/movies"))
            .query(&[("pageNo", page_no), ("limit", limit)]);
        self.send(self.authorized(request).await).await
    }

    pub async fn get_movie_for_update(&self, id: &str) -> Result<MovieDetail, ApiError> {
        let request = self.client.get(self.url(&format!("/movie/for-update/{id}")));
        self.send(self.authorized(request).await).await
    }

    pub async fn search_movies(&self, title: &str) -> Result<Vec<MovieListItem>, ApiError> {
        let request = self
            .client
            .get(self.url("/movie/search"))
            .query(&[("title", title)]);
        self.send(self.authorized(request).await).await
    }

    pub async fn latest_movies(&self, limit: Option<u64>) -> Result<Vec<MovieListItem>, ApiError> {
        let mut request = self.client.get(self.url("/movie/latest-uploads"));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        self.send(request).await
    }

    pub async fn get_movie(&self, id: &str) -> Result<MovieDetail, ApiError> {
        self.send(self.client.get(self.url(&format!("/movie/single/{id}"))))
            .await
    }
}
