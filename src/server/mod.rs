//! JSON API over the content store and the catalog

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::catalog::{self, CatalogState, SortKey};
use crate::commands::routes::routes;
use crate::content::ContentError;
use crate::helpers::url::url_for;
use crate::Site;

/// Build the API router
pub fn router(site: Site) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts_handler))
        .route("/api/posts/:slug", get(get_post_handler))
        .route("/api/slugs", get(list_slugs_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/routes", get(routes_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(site))
}

/// Start the API server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_posts_handler(State(site): State<Arc<Site>>) -> Response {
    Json(site.list_posts()).into_response()
}

async fn list_slugs_handler(State(site): State<Arc<Site>>) -> Response {
    Json(site.list_slugs()).into_response()
}

async fn routes_handler(State(site): State<Arc<Site>>) -> Response {
    let paths: Vec<String> = routes(&site)
        .iter()
        .map(|route| url_for(&site.config, route))
        .collect();
    Json(paths).into_response()
}

async fn get_post_handler(
    State(site): State<Arc<Site>>,
    Path(slug): Path<String>,
) -> Response {
    match site.get_post(&slug) {
        Ok(post) => Json(post).into_response(),
        Err(ContentError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Post not found", "slug": slug })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error loading post {}: {}", slug, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to load post", "slug": slug })),
            )
                .into_response()
        }
    }
}

/// Catalog query string; list values are comma-separated
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogParams {
    q: String,
    categories: String,
    tags: String,
    sort: Option<String>,
    visible: Option<usize>,
}

impl CatalogParams {
    fn into_state(self, page_size: usize) -> Result<CatalogState, String> {
        let mut state = CatalogState::new(page_size);
        state.set_search_query(self.q);
        for category in split_list(&self.categories) {
            state.toggle_category(category);
        }
        for tag in split_list(&self.tags) {
            state.toggle_tag(tag);
        }
        if let Some(sort) = self.sort.as_deref() {
            state.set_sort(sort.parse::<SortKey>()?);
        }
        // Applied last: every setter above resets the window
        if let Some(visible) = self.visible {
            state.visible_count = visible.max(1);
        }
        Ok(state)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

async fn catalog_handler(
    State(site): State<Arc<Site>>,
    Query(params): Query<CatalogParams>,
) -> Response {
    let state = match params.into_state(site.config.catalog.page_size) {
        Ok(state) => state,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    let posts = site.list_posts();
    let view = catalog::evaluate(&posts, &state);
    let cards = view.cards(&site.config.catalog, &site.config.default_image);

    Json(json!({
        "templates": cards,
        "total": view.total,
        "visibleCount": view.visible_count,
        "hasMore": view.has_more,
        "facets": catalog::facets(&posts),
        "state": state,
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use std::fs;
    use tower::ServiceExt;

    fn test_site(dir: &std::path::Path) -> Site {
        let site = Site::with_config(dir.to_path_buf(), SiteConfig::default());
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::write(
            site.posts_dir.join("lead-capture.md"),
            "---\ntitle: Lead Capture\ntags: [Sales, crm]\n---\n# Setup\n",
        )
        .unwrap();
        fs::write(
            site.posts_dir.join("newsletter.md"),
            "---\ntitle: Newsletter\ntags: [Marketing, email]\n---\nbody\n",
        )
        .unwrap();
        site
    }

    async fn get(site: &Site, uri: &str) -> (StatusCode, Value) {
        let response = router(site.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_get_post_found() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        let (status, body) = get(&site, "/api/posts/lead-capture").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Lead Capture");
        assert!(body["content"].as_str().unwrap().contains(r#"id="setup""#));
    }

    #[tokio::test]
    async fn test_get_post_unknown_slug_is_404_json() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        let (status, body) = get(&site, "/api/posts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Post not found");
        assert_eq!(body["slug"], "nope");
    }

    #[tokio::test]
    async fn test_catalog_bad_sort_is_400_json() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        let (status, body) = get(&site, "/api/catalog?sort=random").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("random"));
    }

    #[tokio::test]
    async fn test_catalog_filters() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        let (status, body) = get(&site, "/api/catalog?categories=Sales&tags=crm").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["hasMore"], false);
        assert_eq!(body["templates"][0]["slug"], "lead-capture");
        assert_eq!(body["facets"]["categories"][0], catalog::ALL_CATEGORIES);
    }

    #[tokio::test]
    async fn test_slugs_and_routes() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        let (_, slugs) = get(&site, "/api/slugs").await;
        assert_eq!(slugs, serde_json::json!(["lead-capture", "newsletter"]));

        let (_, routes) = get(&site, "/api/routes").await;
        assert_eq!(routes.as_array().unwrap().len(), 6);
        assert_eq!(routes[4], "/template/lead-capture");
    }

    #[test]
    fn test_catalog_params_into_state() {
        let params = CatalogParams {
            q: " crm".to_string(),
            categories: "Sales, Marketing,".to_string(),
            tags: "email".to_string(),
            sort: Some("alphabetical".to_string()),
            visible: Some(30),
        };
        let state = params.into_state(10).unwrap();
        // Same as the CLI and the browser: the query is used as given
        assert_eq!(state.search_query, " crm");
        assert_eq!(state.selected_categories.len(), 2);
        assert!(state.selected_tags.contains("email"));
        assert_eq!(state.sort, SortKey::Alphabetical);
        assert_eq!(state.visible_count, 30);
    }

    #[test]
    fn test_catalog_params_defaults() {
        let state = CatalogParams::default().into_state(10).unwrap();
        assert_eq!(state, CatalogState::new(10));
    }

    #[test]
    fn test_catalog_params_bad_sort() {
        let params = CatalogParams {
            sort: Some("random".to_string()),
            ..Default::default()
        };
        assert!(params.into_state(10).is_err());
    }
}
