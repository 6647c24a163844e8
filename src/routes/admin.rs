use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Every mutation of portfolio content lives here, behind the token gate.
/// The router is wrapped with the `AdminUser` middleware layer in `lib.rs`,
/// and each handler additionally takes `AdminUser` as an extractor argument,
/// so a route added here can never run unauthenticated by accident.
pub fn admin_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /admin/verify
        // Token check for the dashboard; reaching the handler means the token
        // passed the gate.
        .route("/admin/verify", get(handlers::verify_admin))
        // --- Projects ---
        .route("/projects", post(handlers::create_project))
        .route(
            "/projects/{id}",
            put(handlers::update_project).delete(handlers::delete_project),
        )
        // --- Albums ---
        // DELETE cascades: the album's media images are removed first.
        .route("/albums", post(handlers::create_album))
        .route(
            "/albums/{id}",
            put(handlers::update_album).delete(handlers::delete_album),
        )
        // --- Media ---
        // POST checks that the referenced album exists before storing.
        .route("/media", post(handlers::create_media))
        .route("/media/{id}", delete(handlers::delete_media))
        // --- Reviews ---
        // Create and update bound-check the 1-5 rating before persisting.
        .route("/reviews", post(handlers::create_review))
        .route(
            "/reviews/{id}",
            put(handlers::update_review).delete(handlers::delete_review),
        )
        // --- Contact Inbox ---
        // Listing is admin-only; the public side can only submit.
        .route("/contact", get(handlers::get_contact_messages))
        .route("/contact/{id}", delete(handlers::delete_contact_message))
        .route("/contact/{id}/read", put(handlers::mark_message_read))
        // --- Profile ---
        // Whole-document replace of the singleton.
        .route("/profile", put(handlers::update_profile))
        // --- Uploads ---
        // Multipart file intake; stored under a fresh uuid-based name.
        .route("/upload", post(handlers::upload_file))
}
