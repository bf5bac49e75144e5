//! Route handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{AppState, MAX_PAGE_SIZE};
use crate::mail::{ContactSubmission, RelayOutcome};
use crate::{sitemap, templates};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsParams {
    page: Option<u32>,
    page_size: Option<u32>,
}

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let latest = state.content.list_posts(1, templates::HOME_POST_COUNT).await;
    Html(templates::home(&state.config, &latest.posts))
}

pub async fn blog_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let page_size = state.config.content.posts_per_page;
    let first_page = state.content.list_posts(1, page_size).await;
    Html(templates::blog_index(&state.config, &first_page, page_size))
}

pub async fn contact(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::contact(&state.config))
}

pub async fn blog_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.content.get_post_by_slug(&slug).await {
        Some(post) => {
            let content = state.blocks.render_post(&post);
            Html(templates::post_page(&state.config, &post, &content)).into_response()
        }
        None => (StatusCode::NOT_FOUND, Html(templates::not_found(&state.config))).into_response(),
    }
}

/// JSON pages for the scroll loader
pub async fn api_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostsParams>,
) -> Response {
    let page = params.page.unwrap_or(1);
    let page_size = params
        .page_size
        .unwrap_or(state.config.content.posts_per_page)
        .min(MAX_PAGE_SIZE);

    Json(state.content.list_posts(page, page_size).await).into_response()
}

pub async fn send_mail(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ContactSubmission>,
) -> Response {
    match state.relay.submit(submission).await {
        Ok(RelayOutcome::Sent) | Ok(RelayOutcome::Trapped) => {
            Json(json!({ "message": "Email sent successfully" })).into_response()
        }
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!("Contact message failed: {}", e);
            } else {
                tracing::info!("Contact message rejected: {}", e);
            }
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn sitemap_xml(State(state): State<Arc<AppState>>) -> Response {
    let entries = sitemap::generate(state.config.site_url(), &state.content).await;
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap::to_xml(&entries),
    )
        .into_response()
}
