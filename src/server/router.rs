//! Request pipeline composition.
//!
//! The pipeline is assembled once at startup. Stages, outermost first:
//!
//! 1. Tracing span, request body limit, request scope and panic barrier
//! 2. Static assets from the public directory
//! 3. Session layer (load or create the session, persist it after the response); a failed
//!    save is answered with the generic server error body
//! 4. Session activity stage
//! 5. Feature routers in mount order
//! 6. Landing view at `GET /`
//! 7. Not-found terminal stage
//!
//! Stages 5 to 7 form a chain in which every stage falls back to the next one, so the
//! first mounted router that claims a request handles it and later routers never see it.

use axum::{
    extract::{DefaultBodyLimit, OriginalUri, Request},
    middleware::{from_fn, from_fn_with_state, map_response},
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    trace::TraceLayer,
};

use crate::server::{
    controller::{fallback::not_found, landing},
    fault::{fill_empty_server_error, handle_request_panic, request_scope},
    feature::{FeatureRouters, Mount, ROOT_PREFIX},
    middleware::activity::track_session_activity,
    startup::SessionLayer,
    state::AppState,
};

/// Builds the full request pipeline.
///
/// # Arguments
/// - `state` - Shared application state handed to every stage and feature router
/// - `features` - Feature routers to mount, in their fixed order
/// - `session_layer` - Session layer from `startup::connect_to_session`
///
/// # Returns
/// - `Router` - Ready to be served
pub fn router(state: AppState, features: FeatureRouters, session_layer: SessionLayer) -> Router {
    let mut chain = terminal_stages(state.clone());

    for mount in features.into_mounts().into_iter().rev() {
        tracing::debug!(router = mount.name, prefix = mount.prefix, "Mounting router");
        chain = mount_stage(mount, chain, &state);
    }

    let session_pipeline = chain
        .layer(from_fn_with_state(state.clone(), track_session_activity))
        .layer(session_layer)
        .layer(map_response(fill_empty_server_error));

    let assets = ServeDir::new(&state.config.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(session_pipeline);

    Router::new()
        .fallback_service(assets)
        .layer(CatchPanicLayer::custom(handle_request_panic))
        .layer(from_fn(request_scope))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Landing view followed by the not-found stage.
fn terminal_stages(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::index))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .with_state(state)
}

/// Mounts one feature router in front of `next`.
///
/// Unmatched paths and matched paths with an unhandled method both continue to `next`.
fn mount_stage(mount: Mount, next: Router, state: &AppState) -> Router {
    let forward = next.clone();
    let feature = mount
        .router
        .method_not_allowed_fallback(move |mut request: Request| {
            // Nesting strips the prefix; later stages route on the full path.
            if let Some(OriginalUri(uri)) = request.extensions().get::<OriginalUri>().cloned() {
                *request.uri_mut() = uri;
            }

            let next = forward.clone();
            async move { next.oneshot(request).await }
        })
        .with_state(state.clone());

    let stage = if mount.prefix == ROOT_PREFIX {
        feature
    } else {
        Router::new().nest(mount.prefix, feature)
    };

    stage.fallback_service(next)
}
