use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{actor, movie, user};
use crate::state::AppState;

/// Slack on top of the largest accepted file for the text parts of a multipart form.
const FORM_OVERHEAD: u64 = 1024 * 1024;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let body_limit = config
        .storage
        .max_upload_size
        .saturating_add(FORM_OVERHEAD);

    OpenApiRouter::new()
        .nest("/actor", actor_routes())
        .nest("/movie", movie_routes())
        .nest("/user", user_routes())
        .layer(DefaultBodyLimit::max(
            usize::try_from(body_limit).unwrap_or(usize::MAX),
        ))
}

fn actor_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(actor::create_actor))
        .routes(routes!(actor::update_actor))
        .routes(routes!(actor::remove_actor))
        .routes(routes!(actor::search_actors))
        .routes(routes!(actor::list_actors))
        .routes(routes!(actor::latest_actors))
        .routes(routes!(actor::get_actor))
}

fn movie_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(movie::upload_trailer))
        .routes(routes!(movie::create_movie))
        .routes(routes!(movie::update_movie))
        .routes(routes!(movie::remove_movie))
        .routes(routes!(movie::list_movies))
        .routes(routes!(movie::get_movie_for_update))
        .routes(routes!(movie::search_movies))
        .routes(routes!(movie::latest_movies))
        .routes(routes!(movie::get_movie))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user::create_user))
        .routes(routes!(user::sign_in))
        .routes(routes!(user::is_auth))
}
