use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::actor::{ActorProfile, MessageResponse};
use common::movie::{
    CastMember, CastProfile, CreateMovieResponse, CreatedMovie, MovieDetail, MovieListItem,
    MoviePage, MovieStatus,
};
use common::storage::{MediaKind, MediaStore, StoredMedia};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::movie;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::handlers::actor::find_profiles;
use crate::models::movie::{LatestQuery, MovieFields, MovieSearchQuery, json_list, status_of};
use crate::models::shared::{PageQuery, parse_id};
use crate::state::AppState;
use crate::utils::media;
use crate::utils::upload::{UploadedFile, read_multipart};

const DEFAULT_LATEST_MOVIES: u64 = 5;
const MAX_LATEST_MOVIES: u64 = 20;

pub const POSTER_REMOVE_FAILED: &str = "Could not remove poster from cloud!";
pub const TRAILER_REMOVE_FAILED: &str = "Could not remove trailer from cloud!";

#[utoipa::path(
    post,
    path = "/upload-trailer",
    tag = "Movies",
    operation_id = "uploadTrailer",
    summary = "Upload a trailer video",
    description = "Stores the multipart `video` part and returns the `{url, public_id}` pair that \
        the movie form later submits as its `trailer` field.",
    request_body(content_type = "multipart/form-data", description = "Video file in the `video` part"),
    responses(
        (status = 201, description = "Trailer stored", body = StoredMedia),
        (status = 400, description = "Missing file or not a video", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_trailer(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_multipart(
        multipart,
        "video",
        MediaKind::Video,
        state.config.storage.max_upload_size,
    )
    .await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("Video file is missing!".into()))?;

    let stored = media::upload(&*state.media, &file, MediaKind::Video).await?;
    tracing::info!(public_id = %stored.public_id, "Trailer uploaded");

    Ok((StatusCode::CREATED, Json(stored)))
}

#[utoipa::path(
    post,
    path = "/create",
    tag = "Movies",
    operation_id = "createMovie",
    summary = "Create a movie",
    description = "Multipart form with an optional `poster` image. `genres`, `tags`, `cast`, \
        `writers` and `trailer` are JSON-encoded text parts.",
    request_body(content_type = "multipart/form-data", description = "Movie fields with optional poster"),
    responses(
        (status = 201, description = "Movie created", body = CreateMovieResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart))]
pub async fn create_movie(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_multipart(
        multipart,
        "poster",
        MediaKind::Image,
        state.config.storage.max_upload_size,
    )
    .await?;
    let fields = MovieFields::from_form(&form)?;

    let model = insert_movie(&state.db, &*state.media, fields, form.file.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMovieResponse {
            movie: CreatedMovie {
                id: model.id.to_string(),
                title: model.title,
            },
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/update/{id}",
    tag = "Movies",
    operation_id = "updateMovie",
    summary = "Update a movie",
    description = "Same fields as create. A new `poster` replaces the old one after the old image \
        is removed from the media store. When the submitted trailer has a different `public_id`, \
        the old trailer object is removed first.",
    params(("id" = String, Path, description = "Movie ID")),
    request_body(content_type = "multipart/form-data", description = "Movie fields with optional poster"),
    responses(
        (status = 200, description = "Movie updated", body = MovieDetail),
        (status = 400, description = "Validation error or malformed id", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
        (status = 404, description = "Movie not found", body = ErrorBody),
        (status = 502, description = "Old media could not be removed", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart), fields(id = %id))]
pub async fn update_movie(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<MovieDetail>, AppError> {
    let id = parse_id(&id)?;
    let form = read_multipart(
        multipart,
        "poster",
        MediaKind::Image,
        state.config.storage.max_upload_size,
    )
    .await?;
    let fields = MovieFields::from_form(&form)?;

    let model =
        update_movie_record(&state.db, &*state.media, id, fields, form.file.as_ref()).await?;

    Ok(Json(format_movie(&state.db, model).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Movies",
    operation_id = "removeMovie",
    summary = "Delete a movie",
    description = "Removes the poster (if any) and the trailer from the media store, then deletes \
        the record. The record is kept when either removal is not confirmed.",
    params(("id" = String, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie removed", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
        (status = 404, description = "Movie not found", body = ErrorBody),
        (status = 502, description = "Poster or trailer could not be removed", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn remove_movie(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    delete_movie_record(&state.db, &*state.media, id).await?;
    Ok(Json(MessageResponse::new("Movie removed successfully")))
}

#[utoipa::path(
    get,
    path = "/movies",
    tag = "Movies",
    operation_id = "getMovies",
    summary = "List movies page by page",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of movies, newest first", body = MoviePage),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, query))]
pub async fn list_movies(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MoviePage>, AppError> {
    let (offset, limit) = query.bounds();
    let movies = movie::Entity::find()
        .order_by_desc(movie::Column::CreatedAt)
        .offset(offset)
        .limit(limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(MovieListItem::from)
        .collect();

    Ok(Json(MoviePage { movies }))
}

#[utoipa::path(
    get,
    path = "/for-update/{id}",
    tag = "Movies",
    operation_id = "getMovieForUpdate",
    summary = "Get a movie with resolved actor profiles for the edit form",
    params(("id" = String, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie", body = MovieDetail),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
        (status = 404, description = "Movie not found", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_movie_for_update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieDetail>, AppError> {
    let id = parse_id(&id)?;
    let model = find_movie(&state.db, id).await?;
    Ok(Json(format_movie(&state.db, model).await?))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Movies",
    operation_id = "searchMovies",
    summary = "Full-text search on movie titles",
    params(MovieSearchQuery),
    responses(
        (status = 200, description = "Matching movies (unpaginated)", body = Vec<MovieListItem>),
        (status = 400, description = "Empty query", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, query))]
pub async fn search_movies(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<MovieSearchQuery>,
) -> Result<Json<Vec<MovieListItem>>, AppError> {
    let title = query
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Invalid request!".into()))?;

    let movies = movie::Entity::find()
        .filter(Expr::cust_with_values(
            "to_tsvector('simple', \"title\") @@ phraseto_tsquery('simple', $1)",
            [title.to_string()],
        ))
        .all(&state.db)
        .await?;

    Ok(Json(movies.into_iter().map(MovieListItem::from).collect()))
}

#[utoipa::path(
    get,
    path = "/latest-uploads",
    tag = "Movies",
    operation_id = "getLatestUploads",
    summary = "Most recently created public movies",
    params(LatestQuery),
    responses((status = 200, description = "Latest public movies", body = Vec<MovieListItem>)),
)]
#[instrument(skip(state, query))]
pub async fn latest_movies(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<Vec<MovieListItem>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LATEST_MOVIES)
        .clamp(1, MAX_LATEST_MOVIES);

    let movies = movie::Entity::find()
        .filter(movie::Column::Status.eq(MovieStatus::Public.as_str()))
        .order_by_desc(movie::Column::CreatedAt)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(movies.into_iter().map(MovieListItem::from).collect()))
}

#[utoipa::path(
    get,
    path = "/single/{id}",
    tag = "Movies",
    operation_id = "getSingleMovie",
    summary = "Get a movie by ID",
    params(("id" = String, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie", body = MovieDetail),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Movie not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MovieDetail>, AppError> {
    let id = parse_id(&id)?;
    let model = movie::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found!".into()))?;

    Ok(Json(format_movie(&state.db, model).await?))
}

pub(crate) async fn insert_movie<C: ConnectionTrait>(
    db: &C,
    media_store: &dyn MediaStore,
    fields: MovieFields,
    poster: Option<&UploadedFile>,
) -> Result<movie::Model, AppError> {
    let poster = match poster {
        Some(file) => Some(media::upload(media_store, file, MediaKind::Image).await?),
        None => None,
    };

    let now = Utc::now();
    let new_movie = movie::ActiveModel {
        id: Set(Uuid::now_v7()),
        genres: Set(fields.genres_json()),
        tags: Set(fields.tags_json()),
        cast: Set(fields.cast_json()),
        writers: Set(fields.writers_json()),
        title: Set(fields.title),
        story_line: Set(fields.story_line),
        director: Set(fields.director),
        release_date: Set(fields.release_date),
        status: Set(fields.status.as_str().to_string()),
        kind: Set(fields.kind),
        language: Set(fields.language),
        poster_public_id: Set(poster.as_ref().map(|p| p.public_id.clone())),
        poster_url: Set(poster.map(|p| p.url)),
        trailer_public_id: Set(fields.trailer.public_id),
        trailer_url: Set(fields.trailer.url),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_movie.insert(db).await?;
    tracing::info!(movie_id = %model.id, "Movie created");
    Ok(model)
}

pub(crate) async fn update_movie_record<C: ConnectionTrait>(
    db: &C,
    media_store: &dyn MediaStore,
    id: Uuid,
    fields: MovieFields,
    poster: Option<&UploadedFile>,
) -> Result<movie::Model, AppError> {
    let existing = find_movie(db, id).await?;

    if let (Some(public_id), Some(_)) = (existing.poster_public_id.as_deref(), poster) {
        media::destroy_or_fail(media_store, public_id, MediaKind::Image, POSTER_REMOVE_FAILED)
            .await?;
    }
    if existing.trailer_public_id != fields.trailer.public_id {
        media::destroy_or_fail(
            media_store,
            &existing.trailer_public_id,
            MediaKind::Video,
            TRAILER_REMOVE_FAILED,
        )
        .await?;
    }

    let mut active: movie::ActiveModel = existing.into();

    if let Some(file) = poster {
        let stored = media::upload(media_store, file, MediaKind::Image).await?;
        active.poster_public_id = Set(Some(stored.public_id));
        active.poster_url = Set(Some(stored.url));
    }

    active.genres = Set(fields.genres_json());
    active.tags = Set(fields.tags_json());
    active.cast = Set(fields.cast_json());
    active.writers = Set(fields.writers_json());
    active.title = Set(fields.title);
    active.story_line = Set(fields.story_line);
    active.director = Set(fields.director);
    active.release_date = Set(fields.release_date);
    active.status = Set(fields.status.as_str().to_string());
    active.kind = Set(fields.kind);
    active.language = Set(fields.language);
    active.trailer_public_id = Set(fields.trailer.public_id);
    active.trailer_url = Set(fields.trailer.url);
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await?;
    tracing::info!(movie_id = %model.id, "Movie updated");
    Ok(model)
}

pub(crate) async fn delete_movie_record<C: ConnectionTrait>(
    db: &C,
    media_store: &dyn MediaStore,
    id: Uuid,
) -> Result<(), AppError> {
    let existing = find_movie(db, id).await?;

    if let Some(public_id) = existing.poster_public_id.as_deref() {
        media::destroy_or_fail(media_store, public_id, MediaKind::Image, POSTER_REMOVE_FAILED)
            .await?;
    }
    media::destroy_or_fail(
        media_store,
        &existing.trailer_public_id,
        MediaKind::Video,
        TRAILER_REMOVE_FAILED,
    )
    .await?;

    movie::Entity::delete_by_id(id).exec(db).await?;
    tracing::info!(movie_id = %id, "Movie removed");
    Ok(())
}

/// Resolve director, writers and cast into full actor profiles.
pub(crate) async fn format_movie<C: ConnectionTrait>(
    db: &C,
    m: movie::Model,
) -> Result<MovieDetail, AppError> {
    let cast: Vec<CastMember> = json_list(&m.cast);
    let writer_ids: Vec<Uuid> = json_list::<String>(&m.writers)
        .iter()
        .filter_map(|w| Uuid::parse_str(w).ok())
        .collect();
    let cast_ids: Vec<Uuid> = cast
        .iter()
        .filter_map(|c| Uuid::parse_str(&c.actor).ok())
        .collect();

    let ids: Vec<Uuid> = m
        .director
        .iter()
        .copied()
        .chain(writer_ids.iter().copied())
        .chain(cast_ids.iter().copied())
        .collect();
    let profiles = find_profiles(db, &ids).await?;
    let lookup = |id: &str| -> Option<ActorProfile> {
        profiles.iter().find(|p| p.id == id).cloned()
    };

    let director = m.director.and_then(|d| lookup(&d.to_string()));
    let writers = writer_ids
        .iter()
        .filter_map(|w| lookup(&w.to_string()))
        .collect();
    let cast = cast
        .into_iter()
        .filter_map(|c| {
            lookup(&c.actor).map(|profile| CastProfile {
                id: c.actor,
                profile,
                role_as: c.role_as,
                lead_actor: c.lead_actor,
            })
        })
        .collect();

    Ok(MovieDetail {
        id: m.id.to_string(),
        status: status_of(&m),
        genres: json_list(&m.genres),
        tags: json_list(&m.tags),
        title: m.title,
        story_line: m.story_line,
        director,
        release_date: m.release_date,
        kind: m.kind,
        language: m.language,
        cast,
        writers,
        poster: m.poster_url,
        trailer: m.trailer_url,
    })
}

async fn find_movie<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<movie::Model, AppError> {
    movie::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(AppError::record_not_found)
}
