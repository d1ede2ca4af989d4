use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{HeaderName, Request, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    controllers::{auth, chapters, home, me, novels, reading},
    middlewares::jwt_auth_middleware,
    state::SharedAppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

const CHAPTER_BODY_LIMIT: usize = 5_242_880; // 5MB

pub fn init_router(state: SharedAppState) -> Router {
    let public_route = Router::new()
        .route("/", get(home::index))
        .route("/auth", post(auth::store))
        .route("/novels", get(novels::index))
        .route("/novels/{novel_id}", get(novels::show))
        .route(
            "/novels/{novel_id}/chapters/{chapter_id}",
            get(chapters::show),
        );

    let write_route = Router::new()
        .route("/novels", post(novels::store))
        .route("/novels/{novel_id}", put(novels::update))
        .route("/novels/{novel_id}/chapters", post(chapters::store))
        .route(
            "/novels/{novel_id}/chapters/{chapter_id}",
            put(chapters::update),
        )
        .layer(DefaultBodyLimit::max(CHAPTER_BODY_LIMIT))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    let reading_route = Router::new()
        .route(
            "/novels/{novel_id}/chapters/{chapter_id}/sessions",
            post(reading::mount),
        )
        .route(
            "/reading/sessions/{session_id}/scroll",
            post(reading::scroll),
        )
        .route("/reading/sessions/{session_id}", delete(reading::unmount))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    let me_route = Router::new()
        .route("/me", get(me::index).put(me::update))
        .route("/me/stats", get(me::stats))
        .route("/me/novels", get(me::novels))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    let x_request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or_default();
                let user_agent = request
                    .headers()
                    .get(header::USER_AGENT)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or_default();

                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                tracing::info_span!(
                    "http_request",
                    request_id,
                    method = ?request.method(),
                    uri = ?request.uri(),
                    path = matched_path,
                    version = ?request.version(),
                    user_agent,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id_header));

    public_route
        .merge(write_route)
        .merge(reading_route)
        .merge(me_route)
        .layer(CompressionLayer::new())
        .layer(request_id_middleware)
        .with_state(state)
}
