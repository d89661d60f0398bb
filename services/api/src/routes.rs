//! API service routes

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, put},
};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{require_auth, session_context},
    models::{MessageResponse, Movie, MovieInput},
    oauth::GithubOAuth,
    session::{SESSION_COOKIE, Session},
    state::AppState,
    validation::validate_movie,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let mut movie_writes: Router<AppState> = Router::new()
        .route("/movies", post(create_movie))
        .route("/movies/:id", put(update_movie).delete(delete_movie));

    let mut router: Router<AppState> = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api-docs", get(api_docs))
        .route("/movies", get(list_movies))
        .route("/movies/:id", get(get_movie));

    if state.oauth.is_some() {
        movie_writes = movie_writes.route_layer(middleware::from_fn(require_auth));
        router = router
            .route("/auth/github", get(github_login))
            .route("/auth/github/callback", get(github_callback))
            .route("/logout", get(logout))
            .route("/login", get(login_failed));
    }

    router
        .merge(movie_writes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_context,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Landing page
pub async fn root() -> &'static str {
    "Welcome to the Movie API"
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "movies-api"
    }))
}

/// OpenAPI description
pub async fn api_docs(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.api_docs.as_ref().clone())
}

/// An id that is not a UUID cannot name any record
fn parse_movie_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Movie"))
}

/// Get all movies
pub async fn list_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<Movie>>> {
    let movies = state.movies.find_all().await.map_err(|e| {
        error!("Failed to fetch movies: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(movies))
}

/// Get a movie by ID
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Movie>> {
    let id = parse_movie_id(&id)?;

    let movie = state
        .movies
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch movie {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Movie"))?;

    Ok(Json(movie))
}

/// Create a new movie
pub async fn create_movie(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<MovieInput>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let new_movie = validate_movie(&payload)?;

    let movie = state.movies.create(&new_movie).await.map_err(|e| {
        error!("Failed to create movie: {}", e);
        ApiError::InternalServerError
    })?;
    info!("Created movie {}", movie.id);

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Replace a movie by ID
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<MovieInput>, ApiError>,
) -> ApiResult<Json<Movie>> {
    let id = parse_movie_id(&id)?;
    let new_movie = validate_movie(&payload)?;

    let movie = state
        .movies
        .update_by_id(id, &new_movie)
        .await
        .map_err(|e| {
            error!("Failed to update movie {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Movie"))?;

    Ok(Json(movie))
}

/// Delete a movie by ID
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_movie_id(&id)?;

    state
        .movies
        .delete_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to delete movie {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Movie"))?;
    info!("Deleted movie {}", id);

    Ok(Json(MessageResponse::new("Movie deleted successfully")))
}

fn oauth_client(state: &AppState) -> ApiResult<&GithubOAuth> {
    state.oauth.as_ref().ok_or_else(|| {
        error!("GitHub login requested but OAuth is not configured");
        ApiError::InternalServerError
    })
}

/// Start the GitHub login flow
pub async fn github_login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let request = oauth_client(&state)?.authorize_url();

    state
        .sessions
        .store_pending_login(request.csrf_token.secret(), request.pkce_verifier.secret())
        .await
        .map_err(|e| {
            error!("Failed to store pending login: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Redirect::to(&request.url))
}

/// Query parameters GitHub sends back to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

async fn complete_login(state: &AppState, params: CallbackParams) -> anyhow::Result<Session> {
    let csrf_state = params.state.context("callback without state")?;
    let pkce_verifier = state
        .sessions
        .take_pending_login(&csrf_state)
        .await?
        .context("unknown or expired state")?;

    if let Some(error) = params.error {
        anyhow::bail!("provider returned error: {}", error);
    }
    let code = params.code.context("callback without authorization code")?;

    let oauth = state.oauth.as_ref().context("OAuth is not configured")?;
    let access_token = oauth.exchange_code(code, pkce_verifier).await?;
    let profile = oauth.fetch_profile(&access_token).await?;

    state.sessions.create_session(profile).await
}

/// Complete the GitHub login flow
pub async fn github_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    match complete_login(&state, params).await {
        Ok(session) => {
            info!("GitHub login succeeded, session {}", session.id);
            let cookie = Cookie::build((SESSION_COOKIE, session.id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), Redirect::to("/api-docs")).into_response()
        }
        Err(e) => {
            warn!("GitHub login failed: {:#}", e);
            Redirect::to("/login").into_response()
        }
    }
}

/// Landing page after a failed login
pub async fn login_failed() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(MessageResponse::new("GitHub login failed")),
    )
}

/// Terminate the current session
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> ApiResult<impl IntoResponse> {
    if let Some(session_id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        state
            .sessions
            .delete_session(&session_id)
            .await
            .map_err(|e| {
                error!("Failed to delete session: {}", e);
                ApiError::LogoutFailed
            })?;
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/");
    Ok((jar.remove(removal), Redirect::to("/")))
}
