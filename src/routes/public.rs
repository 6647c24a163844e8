use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines the **unauthenticated** surface: everything a visitor of the
/// portfolio site reads, plus the two public write paths (login and the
/// contact form). Nothing here ever exposes admin-only data — contact
/// messages in particular are only listable behind the admin tier.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Liveness answer at the API root; frontends and uptime checks ping it.
        .route("/", get(handlers::root))
        // POST /admin/login
        // Exchanges the shared admin password for a session token. Public by
        // necessity; a wrong password answers 200 with success=false.
        .route("/admin/login", post(handlers::admin_login))
        // GET /projects, GET /projects/{id}
        // The published project list (newest first) and single-project view.
        .route("/projects", get(handlers::get_projects))
        .route("/projects/{id}", get(handlers::get_project))
        // GET /albums, GET /albums/{id}
        .route("/albums", get(handlers::get_albums))
        .route("/albums/{id}", get(handlers::get_album))
        // GET /media?albumId=...
        // All media images, optionally restricted to one album.
        .route("/media", get(handlers::get_media))
        // GET /reviews, GET /reviews/{id}
        .route("/reviews", get(handlers::get_reviews))
        .route("/reviews/{id}", get(handlers::get_review))
        // POST /contact
        // The contact form. Persists the message, then notifies by email on a
        // detached task so delivery failures never surface here.
        .route("/contact", post(handlers::create_contact_message))
        // GET /profile
        // The owner's singleton profile; answers a default before first write.
        .route("/profile", get(handlers::get_profile))
}
