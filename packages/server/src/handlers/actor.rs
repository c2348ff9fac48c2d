use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::actor::{ActorPage, ActorProfile, MessageResponse};
use common::storage::{MediaKind, MediaStore};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::actor;
use crate::error::{AppError, CLOUD_REMOVE_FAILED, ErrorBody};
use crate::extractors::auth::AdminUser;
use crate::models::actor::{ActorFields, ActorSearchQuery};
use crate::models::shared::{PageQuery, parse_id};
use crate::state::AppState;
use crate::utils::media;
use crate::utils::upload::{UploadedFile, read_multipart};

/// How many actors the latest-uploads endpoint returns.
pub const LATEST_ACTORS: u64 = 12;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Actors",
    operation_id = "createActor",
    summary = "Create an actor",
    description = "Creates an actor from multipart fields `name`, `about`, `gender` and an optional \
        `avatar` image. The image is uploaded to the media store before the record is saved.",
    request_body(content_type = "multipart/form-data", description = "Actor fields with optional avatar"),
    responses(
        (status = 201, description = "Actor created", body = ActorProfile),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart))]
pub async fn create_actor(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_multipart(
        multipart,
        "avatar",
        MediaKind::Image,
        state.config.storage.max_upload_size,
    )
    .await?;
    let fields = ActorFields::from_form(&form)?;

    let profile = insert_actor(&state.db, &*state.media, fields, form.file.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    post,
    path = "/update/{id}",
    tag = "Actors",
    operation_id = "updateActor",
    summary = "Update an actor",
    description = "Overwrites `name`, `about`, `gender`. When a new `avatar` is supplied and the actor \
        already has one, the old image is removed from the media store first; the request fails if \
        that removal is not confirmed.",
    params(("id" = String, Path, description = "Actor ID")),
    request_body(content_type = "multipart/form-data", description = "Actor fields with optional avatar"),
    responses(
        (status = 200, description = "Actor updated", body = ActorProfile),
        (status = 400, description = "Validation error or malformed id", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
        (status = 404, description = "Actor not found", body = ErrorBody),
        (status = 502, description = "Old avatar could not be removed", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, multipart), fields(id = %id))]
pub async fn update_actor(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ActorProfile>, AppError> {
    let id = parse_id(&id)?;
    let form = read_multipart(
        multipart,
        "avatar",
        MediaKind::Image,
        state.config.storage.max_upload_size,
    )
    .await?;
    let fields = ActorFields::from_form(&form)?;

    let profile =
        update_actor_record(&state.db, &*state.media, id, fields, form.file.as_ref()).await?;

    Ok(Json(profile))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Actors",
    operation_id = "removeActor",
    summary = "Delete an actor",
    description = "Removes the actor's avatar from the media store, then deletes the record. If the \
        media store does not confirm the removal the record is kept.",
    params(("id" = String, Path, description = "Actor ID")),
    responses(
        (status = 200, description = "Actor removed", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
        (status = 404, description = "Actor not found", body = ErrorBody),
        (status = 502, description = "Avatar could not be removed", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn remove_actor(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    delete_actor_record(&state.db, &*state.media, id).await?;
    Ok(Json(MessageResponse::new("Record removed successfully.")))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Actors",
    operation_id = "searchActor",
    summary = "Full-text search on actor names",
    params(ActorSearchQuery),
    responses(
        (status = 200, description = "Matching actors (unpaginated)", body = Vec<ActorProfile>),
        (status = 400, description = "Empty query", body = ErrorBody),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, query))]
pub async fn search_actors(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ActorSearchQuery>,
) -> Result<Json<Vec<ActorProfile>>, AppError> {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Search query is missing!".into()))?;

    Ok(Json(search_by_name(&state.db, name).await?))
}

#[utoipa::path(
    get,
    path = "/actors",
    tag = "Actors",
    operation_id = "getActors",
    summary = "List actors page by page",
    description = "Newest first. A page past the end returns an empty `profiles` list.",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of actors", body = ActorPage),
        (status = 401, description = "Missing token or not an admin", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, query))]
pub async fn list_actors(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ActorPage>, AppError> {
    let (offset, limit) = query.bounds();
    let profiles = actor::Entity::find()
        .order_by_desc(actor::Column::CreatedAt)
        .offset(offset)
        .limit(limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(ActorProfile::from)
        .collect();

    Ok(Json(ActorPage { profiles }))
}

#[utoipa::path(
    get,
    path = "/latest-uploads",
    tag = "Actors",
    operation_id = "getLatestActors",
    summary = "The 12 most recently created actors",
    responses((status = 200, description = "Latest actors", body = Vec<ActorProfile>)),
)]
#[instrument(skip(state))]
pub async fn latest_actors(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActorProfile>>, AppError> {
    let actors = actor::Entity::find()
        .order_by_desc(actor::Column::CreatedAt)
        .limit(LATEST_ACTORS)
        .all(&state.db)
        .await?;

    Ok(Json(actors.into_iter().map(ActorProfile::from).collect()))
}

#[utoipa::path(
    get,
    path = "/single/{id}",
    tag = "Actors",
    operation_id = "getSingleActor",
    summary = "Get an actor by ID",
    params(("id" = String, Path, description = "Actor ID")),
    responses(
        (status = 200, description = "Actor", body = ActorProfile),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Actor not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActorProfile>, AppError> {
    let id = parse_id(&id)?;
    let actor = actor::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid Request!, actor not found".into()))?;

    Ok(Json(actor.into()))
}

pub(crate) async fn insert_actor<C: ConnectionTrait>(
    db: &C,
    media_store: &dyn MediaStore,
    fields: ActorFields,
    avatar: Option<&UploadedFile>,
) -> Result<ActorProfile, AppError> {
    let avatar = match avatar {
        Some(file) => Some(media::upload(media_store, file, MediaKind::Image).await?),
        None => None,
    };

    let now = Utc::now();
    let new_actor = actor::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(fields.name),
        about: Set(fields.about),
        gender: Set(fields.gender.as_str().to_string()),
        avatar_public_id: Set(avatar.as_ref().map(|a| a.public_id.clone())),
        avatar_url: Set(avatar.map(|a| a.url)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_actor.insert(db).await?;
    tracing::info!(actor_id = %model.id, "Actor created");

    Ok(model.into())
}

pub(crate) async fn update_actor_record<C: ConnectionTrait>(
    db: &C,
    media_store: &dyn MediaStore,
    id: Uuid,
    fields: ActorFields,
    avatar: Option<&UploadedFile>,
) -> Result<ActorProfile, AppError> {
    let existing = find_actor(db, id).await?;

    if let (Some(public_id), Some(_)) = (existing.avatar_public_id.as_deref(), avatar) {
        media::destroy_or_fail(media_store, public_id, MediaKind::Image, CLOUD_REMOVE_FAILED)
            .await?;
    }

    let mut active: actor::ActiveModel = existing.into();

    if let Some(file) = avatar {
        let stored = media::upload(media_store, file, MediaKind::Image).await?;
        active.avatar_public_id = Set(Some(stored.public_id));
        active.avatar_url = Set(Some(stored.url));
    }

    active.name = Set(fields.name);
    active.about = Set(fields.about);
    active.gender = Set(fields.gender.as_str().to_string());
    active.updated_at = Set(Utc::now());

    let model = active.update(db).await?;
    Ok(model.into())
}

pub(crate) async fn delete_actor_record<C: ConnectionTrait>(
    db: &C,
    media_store: &dyn MediaStore,
    id: Uuid,
) -> Result<(), AppError> {
    let existing = find_actor(db, id).await?;

    if let Some(public_id) = existing.avatar_public_id.as_deref() {
        media::destroy_or_fail(media_store, public_id, MediaKind::Image, CLOUD_REMOVE_FAILED)
            .await?;
    }

    actor::Entity::delete_by_id(id).exec(db).await?;
    tracing::info!(actor_id = %id, "Actor removed");
    Ok(())
}

pub(crate) async fn search_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Vec<ActorProfile>, AppError> {
    let actors = actor::Entity::find()
        .filter(Expr::cust_with_values(
            "to_tsvector('simple', \"name\") @@ phraseto_tsquery('simple', $1)",
            [name.to_string()],
        ))
        .all(db)
        .await?;

    Ok(actors.into_iter().map(ActorProfile::from).collect())
}

/// Look up actors by id, skipping ids that no longer exist.
pub(crate) async fn find_profiles<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> Result<Vec<ActorProfile>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = actor::Entity::find()
        .filter(actor::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;

    Ok(ids
        .iter()
        .filter_map(|id| found.iter().find(|a| a.id == *id))
        .cloned()
        .map(ActorProfile::from)
        .collect())
}

async fn find_actor<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<actor::Model, AppError> {
    actor::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(AppError::record_not_found)
}
