use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::store::Entity;

// Review ratings are a five-star scale, checked before anything is persisted.
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;

// --- Core Application Schemas (Stored Documents) ---
//
// Every entity keeps its original JSON shape (camelCase keys) so the existing
// frontend keeps working unchanged. Ids and timestamp fields are always
// server-assigned at creation time and never touched by updates.

/// Project
///
/// A portfolio project entry. `created_at` orders listings (newest first);
/// `date` is the human-facing display date.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub category: String,
    pub image: String,
    pub gallery: Vec<String>,
    pub technologies: Vec<String>,
    pub featured: bool,
    #[ts(type = "string")]
    pub date: NaiveDate,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Album
///
/// A photo album; parent of [`MediaImage`] documents via `albumId`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub cover: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// MediaImage
///
/// A single image belonging to exactly one album. The `album_id` reference is
/// checked when the image is created but is not enforced against races; the
/// album-delete cascade is what keeps the collection consistent over time.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MediaImage {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub album_id: Uuid,
    pub category: String,
    #[ts(type = "string")]
    pub date: NaiveDate,
}

/// Review
///
/// A testimonial with a 1-5 star rating.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub content: String,
    pub rating: i32,
    #[ts(type = "string")]
    pub date: NaiveDate,
}

/// ContactMessage
///
/// A public contact-form submission. Immutable after creation except for the
/// `read` flag, which the admin dashboard toggles via its own endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub read: bool,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
}

/// Profile
///
/// The site owner's profile — a singleton: at most one instance is ever
/// persisted, and reading an empty collection yields this Default rather than
/// an error. Writing replaces the whole document.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub short_name: String,
    pub title: String,
    pub age: i32,
    pub university: String,
    pub faculty: String,
    pub bio: String,
    pub email: String,
    pub instagram: String,
    pub linkedin: String,
    pub github: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Portfolio Owner".to_string(),
            short_name: "Owner".to_string(),
            title: "Electronics Student & Developer".to_string(),
            age: 21,
            university: "University".to_string(),
            faculty: "Faculty of Electronics".to_string(),
            bio: "Passionate about electronics, programming and creative projects.".to_string(),
            email: "contact@example.com".to_string(),
            instagram: "#".to_string(),
            linkedin: "#".to_string(),
            github: "#".to_string(),
        }
    }
}

// --- Entity Wiring (collection names + listing order) ---

impl Entity for Project {
    const COLLECTION: &'static str = "projects";
    const SORT_FIELD: &'static str = "createdAt";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Album {
    const COLLECTION: &'static str = "albums";
    const SORT_FIELD: &'static str = "createdAt";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for MediaImage {
    const COLLECTION: &'static str = "media";
    const SORT_FIELD: &'static str = "date";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Review {
    const COLLECTION: &'static str = "reviews";
    const SORT_FIELD: &'static str = "date";
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for ContactMessage {
    const COLLECTION: &'static str = "contact";
    const SORT_FIELD: &'static str = "date";
    fn id(&self) -> Uuid {
        self.id
    }
}

// --- Request Payloads (Input Schemas) ---
//
// Create payloads carry only the client-supplied fields. Any id or timestamp a
// client smuggles into the body simply has nowhere to land: the server builds
// the stored document itself.

/// ProjectCreate
///
/// Input payload for POST /projects and the full-replace PUT.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreate {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

/// AlbumCreate
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AlbumCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: String,
}

/// MediaImageCreate
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MediaImageCreate {
    pub title: String,
    pub url: String,
    pub album_id: Uuid,
    #[serde(default)]
    pub category: String,
}

/// ReviewCreate
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    pub name: String,
    pub role: String,
    pub content: String,
    pub rating: i32,
}

/// ContactMessageCreate
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

// --- Server-side Document Assembly ---

impl Project {
    /// Builds a fresh document from a create payload. The id and both
    /// timestamp fields are assigned here, never taken from the client.
    pub fn new(req: ProjectCreate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            long_description: req.long_description,
            category: req.category,
            image: req.image,
            gallery: req.gallery,
            technologies: req.technologies,
            featured: req.featured,
            date: now.date_naive(),
            created_at: now,
        }
    }

    /// Full replace of the mutable fields. Identity and creation timestamps
    /// always come from the stored document, regardless of payload content.
    pub fn replaced_with(&self, req: ProjectCreate) -> Self {
        Self {
            id: self.id,
            title: req.title,
            description: req.description,
            long_description: req.long_description,
            category: req.category,
            image: req.image,
            gallery: req.gallery,
            technologies: req.technologies,
            featured: req.featured,
            date: self.date,
            created_at: self.created_at,
        }
    }
}

impl Album {
    pub fn new(req: AlbumCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            cover: req.cover,
            created_at: Utc::now(),
        }
    }

    pub fn replaced_with(&self, req: AlbumCreate) -> Self {
        Self {
            id: self.id,
            name: req.name,
            description: req.description,
            cover: req.cover,
            created_at: self.created_at,
        }
    }
}

impl MediaImage {
    pub fn new(req: MediaImageCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: req.title,
            url: req.url,
            album_id: req.album_id,
            category: req.category,
            date: Utc::now().date_naive(),
        }
    }
}

impl Review {
    pub fn new(req: ReviewCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: req.name,
            role: req.role,
            content: req.content,
            rating: req.rating,
            date: Utc::now().date_naive(),
        }
    }

    pub fn replaced_with(&self, req: ReviewCreate) -> Self {
        Self {
            id: self.id,
            name: req.name,
            role: req.role,
            content: req.content,
            rating: req.rating,
            date: self.date,
        }
    }
}

impl ContactMessage {
    pub fn new(req: ContactMessageCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
            read: false,
            date: Utc::now(),
        }
    }
}

// --- Wire Responses ---

/// AdminLogin
///
/// Body of POST /admin/login. The password is the single shared admin
/// credential; there are no user accounts.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminLogin {
    pub password: String,
}

/// TokenResponse
///
/// Login answer. A wrong password is reported as `success: false` with HTTP
/// 200 — a deliberate wire-contract quirk the frontend depends on, distinct
/// from the 401s the auth gate produces elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TokenResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// VerifyResponse
///
/// Answer of GET /admin/verify for a token that passed the gate.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct VerifyResponse {
    pub valid: bool,
    pub admin: bool,
}

/// SuccessResponse
///
/// Generic acknowledgement for deletes and the read-flag update.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SuccessResponse {
    pub success: bool,
}

/// UploadResponse
///
/// Points at the static mount where the freshly stored file is served.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UploadResponse {
    pub url: String,
}
