//! Router construction and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{
    AUTHORIZATION, CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
};
use axum::http::{HeaderName, HeaderValue, Method, Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::task::AbortHandle;
use tower_governor::{GovernorError, GovernorLayer};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::scrapers::HomepageSource;
use crate::server::routes::{health_handler, news_handler, not_found_handler, root_handler};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");
const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

/// State shared by every request.
pub struct AppState<S> {
    pub source: Arc<S>,
    pub base_origin: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            base_origin: Arc::clone(&self.base_origin),
        }
    }
}

/// The application router plus the background task that prunes idle
/// rate-limit buckets. The task is stopped when this value is dropped.
pub struct App {
    router: Router,
    pruner: AbortHandle,
}

impl App {
    /// A handle to the router. Clones share state and rate limits.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    #[cfg(test)]
    pub(crate) fn pruner_handle(&self) -> AbortHandle {
        self.pruner.clone()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.pruner.abort();
    }
}

/// Build the application around `source`.
///
/// `/api/*` is rate limited per client IP; `/` and `/health` are not.
///
/// # Arguments
///
/// * `config` - Base origin, CORS allow-list and rate limit settings
/// * `source` - Where `/api/news` gets the homepage HTML from
///
/// # Returns
///
/// The [`App`], or [`AppError::Config`] when the rate limit or a CORS
/// origin is invalid.
///
/// # Examples
///
/// ```no_run
/// # async fn run() -> krishi_news::error::Result<()> {
/// use krishi_news::config::AppConfig;
/// use krishi_news::scrapers::krishijagran::HttpSource;
/// use krishi_news::server::build_app;
///
/// let config = AppConfig::default();
/// let app = build_app(&config, HttpSource::new(&config)?)?;
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
/// axum::serve(listener, app.router()).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_app<S: HomepageSource>(config: &AppConfig, source: S) -> Result<App> {
    let state = AppState {
        source: Arc::new(source),
        base_origin: Arc::from(config.base_origin.as_str()),
    };
    let cors = cors_layer(&config.server.allowed_origins)?;

    // Per-IP token bucket: `max_requests` burst, refilled evenly over the
    // window. Client IPs come from forwarding headers first, then the peer.
    let limit = &config.server.rate_limit;
    let governor = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(limit.replenish_every_secs())
            .burst_size(limit.max_requests)
            .error_handler(rate_limit_response)
            .finish()
            .ok_or_else(|| AppError::config("invalid rate limit configuration"))?,
    );

    // Drop buckets for clients that have gone quiet.
    let limiter = governor.limiter().clone();
    let mut prune = tokio::time::interval(Duration::from_secs(limit.window_secs));
    let pruner = tokio::spawn(async move {
        loop {
            prune.tick().await;
            limiter.retain_recent();
            debug!(tracked = limiter.len(), "Pruned rate limiter state");
        }
    })
    .abort_handle();
    info!(
        max_requests = limit.max_requests,
        window_secs = limit.window_secs,
        "Rate limiting /api"
    );

    let api = Router::new()
        .route("/api/news", get(news_handler::<S>))
        .route("/api/health", get(health_handler))
        .layer(GovernorLayer { config: governor });

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            CROSS_ORIGIN_OPENER_POLICY,
            HeaderValue::from_static("same-origin-allow-popups"),
        ))
        .layer(TraceLayer::new_for_http());

    Ok(App { router, pruner })
}

/// JSON bodies for requests the rate limiter turns away.
fn rate_limit_response(error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            debug!(wait_time, "Rate limited");
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "message": RATE_LIMIT_MESSAGE })),
            )
                .into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            warn!("Could not determine client address for rate limiting");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Unable to determine client address" })),
            )
                .into_response()
        }
        GovernorError::Other { code, msg, .. } => (
            code,
            Json(json!({ "message": msg.unwrap_or_else(|| RATE_LIMIT_MESSAGE.to_string()) })),
        )
            .into_response(),
    }
}

/// CORS restricted to `allowed_origins`, with credentials and a 24h preflight cache.
fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| AppError::config(format!("invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(?allowed_origins, "CORS allow-list");

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, X_REQUESTED_WITH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(24 * 60 * 60)))
}
