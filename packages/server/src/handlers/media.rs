use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::public_id;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/media/{public_id}",
    tag = "Media",
    operation_id = "getMedia",
    summary = "Stream a stored image or video",
    description = "Serves objects written by the media store. Public ids never get reused, so the \
        id doubles as the ETag.",
    params(("public_id" = String, Path, description = "Public id, e.g. `images/<uuid>.jpg`")),
    responses(
        (status = 200, description = "Media bytes", content_type = "application/octet-stream"),
        (status = 304, description = "Not modified"),
        (status = 400, description = "Malformed public id", body = ErrorBody),
        (status = 404, description = "No such object", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let public_id = public_id::validate(&public_id)?;

    let etag_value = format!("\"{public_id}\"");
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let reader = state.media.open(public_id).await?;
    let body = Body::from_stream(ReaderStream::new(reader));
    let mime = mime_guess::from_path(public_id).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
