use chrono::NaiveDate;
use common::movie::{CastMember, MovieListItem, MovieStatus, is_known_genre};
use common::storage::{MediaKind, StoredMedia, public_id};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::entity::movie;
use crate::error::AppError;
use crate::utils::upload::MultipartForm;

/// A cast entry after its actor id has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastEntry {
    pub actor: Uuid,
    pub role_as: String,
    pub lead_actor: bool,
}

/// Validated text fields of the movie create/update form.
///
/// List-valued fields arrive as JSON strings inside the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFields {
    pub title: String,
    pub story_line: String,
    pub director: Option<Uuid>,
    pub release_date: NaiveDate,
    pub status: MovieStatus,
    pub kind: String,
    pub language: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub cast: Vec<CastEntry>,
    pub writers: Vec<Uuid>,
    pub trailer: StoredMedia,
}

impl MovieFields {
    pub fn from_form(form: &MultipartForm) -> Result<Self, AppError> {
        let title = form.require("title", "Movie title is missing!")?.to_string();
        let story_line = form.require("storyLine", "Storyline is important!")?.to_string();
        let language = form.require("language", "Language is missing!")?.to_string();
        let release_date =
            parse_release_date(form.require("releaseDate", "Release date is missing!")?)?;
        let status = form
            .text("status")
            .and_then(|s| s.parse::<MovieStatus>().ok())
            .ok_or_else(|| AppError::Validation("Movie status must be public or private!".into()))?;
        let kind = form.require("type", "Movie type is missing!")?.to_string();

        let genres: Vec<String> = json_field(form, "genres", "Genres must be an array of strings!")?
            .ok_or_else(|| AppError::Validation("Genres must be an array of strings!".into()))?;
        if genres.is_empty() {
            return Err(AppError::Validation(
                "Genres must be an array of strings!".into(),
            ));
        }
        if !genres.iter().all(|g| is_known_genre(g)) {
            return Err(AppError::Validation("Invalid genres!".into()));
        }

        let tags: Vec<String> = json_field(form, "tags", "Tags must be an array of strings!")?
            .ok_or_else(|| AppError::Validation("Tags must be an array of strings!".into()))?;
        let tags: Vec<String> = tags.iter().map(|t| t.trim().to_string()).collect();
        if tags.is_empty() || tags.iter().any(|t| t.is_empty()) {
            return Err(AppError::Validation(
                "Tags must be an array of strings!".into(),
            ));
        }

        let cast: Vec<CastMember> =
            json_field(form, "cast", "Cast must be an array of objects!")?.unwrap_or_default();
        let cast = cast
            .into_iter()
            .map(|c| {
                let actor = Uuid::parse_str(&c.actor)
                    .map_err(|_| AppError::Validation("Invalid cast id inside cast!".into()))?;
                let role_as = c.role_as.trim();
                if role_as.is_empty() {
                    return Err(AppError::Validation(
                        "Role as is missing inside cast!".into(),
                    ));
                }
                Ok(CastEntry {
                    actor,
                    role_as: role_as.to_string(),
                    lead_actor: c.lead_actor,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let writers: Vec<String> =
            json_field(form, "writers", "Writers must be an array of ids!")?.unwrap_or_default();
        let writers = writers
            .iter()
            .map(|w| {
                Uuid::parse_str(w).map_err(|_| AppError::Validation("Invalid writer id!".into()))
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let director = form
            .text("director")
            .map(|d| {
                Uuid::parse_str(d).map_err(|_| AppError::Validation("Invalid director id!".into()))
            })
            .transpose()?;

        let trailer: StoredMedia = json_field(form, "trailer", "Invalid trailer info!")?
            .ok_or_else(|| AppError::Validation("Trailer info is missing!".into()))?;
        validate_trailer(&trailer)?;

        Ok(Self {
            title,
            story_line,
            director,
            release_date,
            status,
            kind,
            language,
            genres,
            tags,
            cast,
            writers,
            trailer,
        })
    }

    /// Actor ids referenced anywhere in the movie, director first.
    pub fn actor_ids(&self) -> Vec<Uuid> {
        self.director
            .iter()
            .copied()
            .chain(self.writers.iter().copied())
            .chain(self.cast.iter().map(|c| c.actor))
            .collect()
    }

    pub fn genres_json(&self) -> serde_json::Value {
        serde_json::json!(self.genres)
    }

    pub fn tags_json(&self) -> serde_json::Value {
        serde_json::json!(self.tags)
    }

    pub fn writers_json(&self) -> serde_json::Value {
        serde_json::json!(
            self.writers
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
        )
    }

    pub fn cast_json(&self) -> serde_json::Value {
        let cast: Vec<CastMember> = self
            .cast
            .iter()
            .map(|c| CastMember {
                actor: c.actor.to_string(),
                role_as: c.role_as.clone(),
                lead_actor: c.lead_actor,
            })
            .collect();
        serde_json::json!(cast)
    }
}

/// Parse a JSON-encoded form field. `Ok(None)` when the field is absent.
fn json_field<T: DeserializeOwned>(
    form: &MultipartForm,
    name: &str,
    invalid_message: &str,
) -> Result<Option<T>, AppError> {
    form.text(name)
        .map(|raw| {
            serde_json::from_str(raw).map_err(|_| AppError::Validation(invalid_message.into()))
        })
        .transpose()
}

/// Accepts `YYYY-MM-DD`, or a full timestamp whose date part is used.
fn parse_release_date(raw: &str) -> Result<NaiveDate, AppError> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid release date!".into()))
}

fn validate_trailer(trailer: &StoredMedia) -> Result<(), AppError> {
    let url_ok = trailer.url.starts_with("http://") || trailer.url.starts_with("https://");
    let id_ok = public_id::validate(&trailer.public_id).is_ok()
        && MediaKind::Video.owns(&trailer.public_id);
    if !url_ok || !id_ok {
        return Err(AppError::Validation("Invalid trailer info!".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieSearchQuery {
    /// Title (or phrase of a title) to look for.
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LatestQuery {
    /// Number of movies to return (1-20). Default: 5.
    pub limit: Option<u64>,
}

/// Decode a JSON list column, tolerating rows written before a column existed.
pub fn json_list<T: DeserializeOwned>(value: &serde_json::Value) -> Vec<T> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

pub fn status_of(m: &movie::Model) -> MovieStatus {
    m.status.parse().unwrap_or(MovieStatus::Private)
}

impl From<movie::Model> for MovieListItem {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id.to_string(),
            status: status_of(&m),
            genres: json_list(&m.genres),
            title: m.title,
            poster: m.poster_url,
        }
    }
}
