use crate::{
    AppState,
    auth::{AdminUser, issue_token},
    error::ApiError,
    mailer::Mailer,
    storage::StorageService,
    models::{
        self, Album, AlbumCreate, ContactMessage, ContactMessageCreate, MediaImage,
        MediaImageCreate, Profile, Project, ProjectCreate, Review, ReviewCreate, AdminLogin,
        SuccessResponse, TokenResponse, UploadResponse, VerifyResponse, RATING_MAX, RATING_MIN,
    },
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

// --- Filter Structs ---

/// MediaFilter
///
/// Accepted query parameters for GET /media: an optional album restriction.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MediaFilter {
    /// Restrict the listing to images of a single album.
    pub album_id: Option<Uuid>,
}

// --- Root ---

/// root
///
/// [Public Route] Liveness answer at the API root, matching the original wire shape.
#[utoipa::path(get, path = "/", responses((status = 200, description = "API status")))]
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Portfolio API", "status": "running" }))
}

// --- Auth ---

/// admin_login
///
/// [Public Route] Exchanges the shared admin password for a 7-day session token.
///
/// A wrong password answers HTTP 200 with `success: false` — not a 401. This
/// asymmetry with the auth gate is part of the existing wire contract and is
/// preserved on purpose.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = AdminLogin,
    responses((status = 200, description = "Login outcome", body = TokenResponse))
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<AdminLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    if payload.password == state.config.admin_password {
        let token = issue_token(&state.config.jwt_secret)?;
        Ok(Json(TokenResponse {
            success: true,
            token: Some(token),
            message: None,
        }))
    } else {
        Ok(Json(TokenResponse {
            success: false,
            token: None,
            message: Some("Incorrect password".to_string()),
        }))
    }
}

/// verify_admin
///
/// [Admin Route] Confirms the presented token still passes the gate and echoes
/// its admin claim. Reaching the handler at all means the token verified.
#[utoipa::path(
    get,
    path = "/admin/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing, expired, or invalid token")
    )
)]
pub async fn verify_admin(admin: AdminUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        admin: admin.admin,
    })
}

// --- Projects ---

/// get_projects
///
/// [Public Route] Lists projects, newest first, capped at the store's limit.
#[utoipa::path(
    get,
    path = "/projects",
    responses((status = 200, description = "All projects", body = [Project]))
)]
pub async fn get_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Project>>, ApiError> {
    Ok(Json(state.documents.list::<Project>().await?))
}

/// get_project
///
/// [Public Route] Retrieves a single project by id.
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Found", body = Project),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Project>, ApiError> {
    state
        .documents
        .get::<Project>(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Project"))
}

/// create_project
///
/// [Admin Route] Stores a new project. The server assigns the id and
/// timestamps; anything the client put there is ignored.
#[utoipa::path(
    post,
    path = "/projects",
    request_body = ProjectCreate,
    responses((status = 200, description = "Created", body = Project))
)]
pub async fn create_project(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<ProjectCreate>,
) -> Result<Json<models::Project>, ApiError> {
    let project = Project::new(payload);
    state.documents.create(&project).await?;
    Ok(Json(project))
}

/// update_project
///
/// [Admin Route] Full replace of a project's mutable fields; the id and
/// creation timestamp are taken from the stored document.
#[utoipa::path(
    put,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = ProjectCreate,
    responses(
        (status = 200, description = "Updated", body = Project),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_project(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectCreate>,
) -> Result<Json<models::Project>, ApiError> {
    let existing = state
        .documents
        .get::<Project>(id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;
    let updated = existing.replaced_with(payload);
    // A false replace means a concurrent delete won; same answer as a miss.
    if !state.documents.replace(&updated).await? {
        return Err(ApiError::NotFound("Project"));
    }
    Ok(Json(updated))
}

/// delete_project
///
/// [Admin Route] Deletes a project. A second call on the same id answers 404 —
/// the observable shape of the idempotent delete contract.
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_project(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.documents.delete::<Project>(id).await? {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(ApiError::NotFound("Project"))
    }
}

// --- Albums ---

/// get_albums
///
/// [Public Route] Lists albums, newest first.
#[utoipa::path(
    get,
    path = "/albums",
    responses((status = 200, description = "All albums", body = [Album]))
)]
pub async fn get_albums(
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Album>>, ApiError> {
    Ok(Json(state.documents.list::<Album>().await?))
}

/// get_album
///
/// [Public Route] Retrieves a single album by id.
#[utoipa::path(
    get,
    path = "/albums/{id}",
    params(("id" = Uuid, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Found", body = Album),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Album>, ApiError> {
    state
        .documents
        .get::<Album>(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Album"))
}

/// create_album
///
/// [Admin Route] Stores a new album.
#[utoipa::path(
    post,
    path = "/albums",
    request_body = AlbumCreate,
    responses((status = 200, description = "Created", body = Album))
)]
pub async fn create_album(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<AlbumCreate>,
) -> Result<Json<models::Album>, ApiError> {
    let album = Album::new(payload);
    state.documents.create(&album).await?;
    Ok(Json(album))
}

/// update_album
///
/// [Admin Route] Full replace of an album's mutable fields.
#[utoipa::path(
    put,
    path = "/albums/{id}",
    params(("id" = Uuid, Path, description = "Album ID")),
    request_body = AlbumCreate,
    responses(
        (status = 200, description = "Updated", body = Album),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_album(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AlbumCreate>,
) -> Result<Json<models::Album>, ApiError> {
    let existing = state
        .documents
        .get::<Album>(id)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;
    let updated = existing.replaced_with(payload);
    if !state.documents.replace(&updated).await? {
        return Err(ApiError::NotFound("Album"));
    }
    Ok(Json(updated))
}

/// delete_album
///
/// [Admin Route] Deletes an album and, first, every media image that belongs
/// to it. A missing album answers 404 and deletes nothing.
#[utoipa::path(
    delete,
    path = "/albums/{id}",
    params(("id" = Uuid, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Album and its media deleted", body = SuccessResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_album(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.documents.delete_album(id).await? {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(ApiError::NotFound("Album"))
    }
}

// --- Media ---

/// get_media
///
/// [Public Route] Lists media images, optionally restricted to one album.
#[utoipa::path(
    get,
    path = "/media",
    params(MediaFilter),
    responses((status = 200, description = "Media images", body = [MediaImage]))
)]
pub async fn get_media(
    State(state): State<AppState>,
    Query(filter): Query<MediaFilter>,
) -> Result<Json<Vec<models::MediaImage>>, ApiError> {
    let images = match filter.album_id {
        Some(album_id) => {
            state
                .documents
                .list_where::<MediaImage>("albumId", &album_id.to_string())
                .await?
        }
        None => state.documents.list::<MediaImage>().await?,
    };
    Ok(Json(images))
}

/// create_media
///
/// [Admin Route] Stores a new media image. The referenced album must exist at
/// creation time; the check is not race-proof and does not try to be — the
/// album-delete cascade is what keeps the collection consistent long term.
#[utoipa::path(
    post,
    path = "/media",
    request_body = MediaImageCreate,
    responses(
        (status = 200, description = "Created", body = MediaImage),
        (status = 422, description = "Unknown album")
    )
)]
pub async fn create_media(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<MediaImageCreate>,
) -> Result<Json<models::MediaImage>, ApiError> {
    if state
        .documents
        .get::<Album>(payload.album_id)
        .await?
        .is_none()
    {
        return Err(ApiError::Validation(format!(
            "albumId {} does not reference an existing album",
            payload.album_id
        )));
    }
    let image = MediaImage::new(payload);
    state.documents.create(&image).await?;
    Ok(Json(image))
}

/// delete_media
///
/// [Admin Route] Deletes a single media image.
#[utoipa::path(
    delete,
    path = "/media/{id}",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_media(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.documents.delete::<MediaImage>(id).await? {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(ApiError::NotFound("Image"))
    }
}

// --- Reviews ---

/// check_rating
///
/// Rejects out-of-range ratings before anything touches the store.
fn check_rating(rating: i32) -> Result<(), ApiError> {
    if (RATING_MIN..=RATING_MAX).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "rating must be between {RATING_MIN} and {RATING_MAX}"
        )))
    }
}

/// get_reviews
///
/// [Public Route] Lists reviews, newest first.
#[utoipa::path(
    get,
    path = "/reviews",
    responses((status = 200, description = "All reviews", body = [Review]))
)]
pub async fn get_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Review>>, ApiError> {
    Ok(Json(state.documents.list::<Review>().await?))
}

/// get_review
///
/// [Public Route] Retrieves a single review by id.
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Found", body = Review),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Review>, ApiError> {
    state
        .documents
        .get::<Review>(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Review"))
}

/// create_review
///
/// [Admin Route] Stores a new review after bound-checking the rating.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = ReviewCreate,
    responses(
        (status = 200, description = "Created", body = Review),
        (status = 422, description = "Rating out of range")
    )
)]
pub async fn create_review(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<ReviewCreate>,
) -> Result<Json<models::Review>, ApiError> {
    check_rating(payload.rating)?;
    let review = Review::new(payload);
    state.documents.create(&review).await?;
    Ok(Json(review))
}

/// update_review
///
/// [Admin Route] Full replace of a review's mutable fields, rating re-checked.
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = ReviewCreate,
    responses(
        (status = 200, description = "Updated", body = Review),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Rating out of range")
    )
)]
pub async fn update_review(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewCreate>,
) -> Result<Json<models::Review>, ApiError> {
    check_rating(payload.rating)?;
    let existing = state
        .documents
        .get::<Review>(id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;
    let updated = existing.replaced_with(payload);
    if !state.documents.replace(&updated).await? {
        return Err(ApiError::NotFound("Review"));
    }
    Ok(Json(updated))
}

/// delete_review
///
/// [Admin Route] Deletes a review.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_review(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.documents.delete::<Review>(id).await? {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(ApiError::NotFound("Review"))
    }
}

// --- Contact ---

/// get_contact_messages
///
/// [Admin Route] Lists every contact message, newest first.
#[utoipa::path(
    get,
    path = "/contact",
    responses((status = 200, description = "All messages", body = [ContactMessage]))
)]
pub async fn get_contact_messages(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::ContactMessage>>, ApiError> {
    Ok(Json(state.documents.list::<ContactMessage>().await?))
}

/// create_contact_message
///
/// [Public Route] Stores a contact-form submission and fires the notification
/// email in a detached task. The message is persisted before the mail is even
/// attempted, and a delivery failure is logged and swallowed — it never fails
/// this request.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactMessageCreate,
    responses((status = 200, description = "Stored", body = ContactMessage))
)]
pub async fn create_contact_message(
    State(state): State<AppState>,
    Json(payload): Json<ContactMessageCreate>,
) -> Result<Json<models::ContactMessage>, ApiError> {
    let message = ContactMessage::new(payload);
    state.documents.create(&message).await?;

    let mailer = state.mailer.clone();
    let snapshot = message.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_contact_notification(&snapshot).await {
            tracing::warn!("Contact notification failed: {e}");
        }
    });

    Ok(Json(message))
}

/// mark_message_read
///
/// [Admin Route] Sets `read = true`. The only field of a contact message that
/// ever changes after creation.
#[utoipa::path(
    put,
    path = "/contact/{id}/read",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Marked read", body = SuccessResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn mark_message_read(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let mut message = state
        .documents
        .get::<ContactMessage>(id)
        .await?
        .ok_or(ApiError::NotFound("Message"))?;
    message.read = true;
    if !state.documents.replace(&message).await? {
        return Err(ApiError::NotFound("Message"));
    }
    Ok(Json(SuccessResponse { success: true }))
}

/// delete_contact_message
///
/// [Admin Route] Deletes a contact message.
#[utoipa::path(
    delete,
    path = "/contact/{id}",
    params(("id" = Uuid, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_contact_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.documents.delete::<ContactMessage>(id).await? {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(ApiError::NotFound("Message"))
    }
}

// --- Profile ---

/// get_profile
///
/// [Public Route] Returns the singleton profile, or its documented default
/// when none has been written yet. The default is a normal 200, never a 404.
#[utoipa::path(
    get,
    path = "/profile",
    responses((status = 200, description = "Profile", body = Profile))
)]
pub async fn get_profile(
    State(state): State<AppState>,
) -> Result<Json<models::Profile>, ApiError> {
    Ok(Json(state.documents.profile().await?))
}

/// update_profile
///
/// [Admin Route] Replaces the singleton wholesale — there is no partial merge
/// and no delete endpoint for the profile.
#[utoipa::path(
    put,
    path = "/profile",
    request_body = Profile,
    responses((status = 200, description = "Replaced", body = Profile))
)]
pub async fn update_profile(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<Profile>,
) -> Result<Json<models::Profile>, ApiError> {
    state.documents.replace_profile(&payload).await?;
    Ok(Json(payload))
}

// --- File Upload ---

/// upload_file
///
/// [Admin Route] Accepts a multipart `file` field, stores it under a fresh
/// `{uuid}.{ext}` name (so uploads never overwrite each other), and answers
/// with the URL it will be served from.
#[utoipa::path(
    post,
    path = "/upload",
    responses(
        (status = 200, description = "Stored", body = UploadResponse),
        (status = 422, description = "No file field in the request")
    )
)]
pub async fn upload_file(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("malformed multipart body".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        // Derive the extension from the client's filename, nothing else.
        let original = field.file_name().unwrap_or("upload.bin").to_string();
        let extension = std::path::Path::new(&original)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("bin");
        let filename = format!("{}.{}", Uuid::new_v4(), extension);

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("failed to read file field".to_string()))?;

        state.storage.save(&filename, &data).await.map_err(|e| {
            tracing::error!("Upload failed: {e}");
            ApiError::Unavailable
        })?;

        return Ok(Json(UploadResponse {
            url: format!("/api/uploads/{filename}"),
        }));
    }

    Err(ApiError::Validation("missing file field".to_string()))
}
