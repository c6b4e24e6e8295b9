use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeader;
use tower_http::trace::TraceLayer;

use admissions_core::health::healthz;
use admissions_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    application::{
        create_application, delete_application, get_application, list_applications,
        update_application,
    },
    document::{list_documents, upload_document},
    draft::{discard_draft, finalize_draft, get_draft, save_draft},
    health::readyz,
    otp::{request_otp, verify_otp},
    user::lookup_by_phone,
};
use crate::state::AppState;
use crate::usecase::document::UPLOADS_URL_PREFIX;

pub fn build_router(state: AppState) -> Router {
    let uploads = SetResponseHeader::overriding(
        ServeDir::new(state.storage.root()),
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    let body_limit = state.max_upload_bytes;

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // OTP
        .route("/otp/request", post(request_otp))
        .route("/otp/verify", post(verify_otp))
        // Users
        .route("/users/lookup-by-phone", post(lookup_by_phone))
        // Applications
        .route(
            "/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/applications/{id}",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
        // Documents
        .route("/documents", get(list_documents).post(upload_document))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        // Drafts
        .route(
            "/drafts/{user_id}",
            get(get_draft).put(save_draft).delete(discard_draft),
        )
        .route("/drafts/{user_id}/finalize", post(finalize_draft))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
