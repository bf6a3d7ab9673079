//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::domains::hiring::HireCoordinator;
use crate::kernel::{Notifier, PresenceRegistry};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    create_gig_handler, delete_gig_handler, get_gig_handler, gig_bids_handler, health_handler,
    hire_handler, list_gigs_handler, login_handler, me_handler, my_bids_handler, my_gigs_handler,
    place_bid_handler, register_handler, stream_handler, update_gig_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub presence: PresenceRegistry,
    pub notifier: Notifier,
    pub hire_coordinator: HireCoordinator,
}

/// Build the Axum application router.
///
/// The presence registry is created here, once, and handed to both the
/// notifier and the stream route through the shared state. There is no
/// global connection map.
pub fn build_app(
    pool: PgPool,
    jwt_secret: &str,
    jwt_issuer: String,
    allowed_origins: Vec<String>,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));
    let presence = PresenceRegistry::new();
    let notifier = Notifier::new(presence.clone());
    let hire_coordinator = HireCoordinator::new(pool.clone());

    let state = AxumAppState {
        db_pool: pool,
        jwt_service: jwt_service.clone(),
        presence,
        notifier,
        hire_coordinator,
    };

    let cors = build_cors_layer(&allowed_origins);

    Router::new()
        .route("/health", get(health_handler))
        // Auth
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        // Gigs
        .route("/api/gigs", get(list_gigs_handler).post(create_gig_handler))
        .route("/api/gigs/user/me", get(my_gigs_handler))
        .route(
            "/api/gigs/:id",
            get(get_gig_handler)
                .put(update_gig_handler)
                .delete(delete_gig_handler),
        )
        // Bids
        .route("/api/bids", post(place_bid_handler))
        .route("/api/bids/user/me", get(my_bids_handler))
        .route("/api/bids/:gig_id", get(gig_bids_handler))
        .route("/api/bids/:bid_id/hire", patch(hire_handler))
        // Real-time notifications
        .route("/api/notifications/stream", get(stream_handler))
        .layer(middleware::from_fn(move |request, next| {
            jwt_auth_middleware(jwt_service.clone(), request, next)
        }))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        // Development default: allow everything.
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .allow_credentials(true)
    }
}
