use portfolio_api::{
    models::{
        Album, AlbumCreate, ContactMessage, ContactMessageCreate, MediaImage, MediaImageCreate,
        Profile, Project, ProjectCreate, Review, ReviewCreate,
    },
    store::{Documents, LIST_CAP, MemoryStore, StoreState},
};
use std::sync::Arc;
use uuid::Uuid;

// --- Helpers ---

fn documents() -> Documents {
    Documents::new(Arc::new(MemoryStore::new()) as StoreState)
}

fn sample_project(title: &str) -> Project {
    Project::new(ProjectCreate {
        title: title.to_string(),
        description: "A project".to_string(),
        category: "web".to_string(),
        ..Default::default()
    })
}

fn sample_album(name: &str) -> Album {
    Album::new(AlbumCreate {
        name: name.to_string(),
        ..Default::default()
    })
}

fn sample_media(title: &str, album_id: Uuid) -> MediaImage {
    MediaImage::new(MediaImageCreate {
        title: title.to_string(),
        url: format!("/api/uploads/{title}.jpg"),
        album_id,
        category: "travel".to_string(),
    })
}

// --- Generic CRUD ---

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let docs = documents();
    let project = sample_project("Portfolio Site");

    docs.create(&project).await.unwrap();

    let fetched: Project = docs.get(project.id).await.unwrap().expect("stored");
    assert_eq!(fetched.id, project.id);
    assert_eq!(fetched.title, "Portfolio Site");
    assert_eq!(fetched.created_at, project.created_at);
}

#[tokio::test]
async fn test_get_missing_is_none_not_error() {
    let docs = documents();
    let fetched: Option<Project> = docs.get(Uuid::new_v4()).await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
async fn test_list_empty_collection_is_empty_vec() {
    let docs = documents();
    let all: Vec<Review> = docs.list().await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let docs = documents();

    // created_at drives the ordering; force distinct, out-of-order values.
    let mut older = sample_project("older");
    older.created_at = "2024-01-01T00:00:00Z".parse().unwrap();
    let mut newer = sample_project("newer");
    newer.created_at = "2025-06-01T00:00:00Z".parse().unwrap();
    let mut middle = sample_project("middle");
    middle.created_at = "2024-09-15T00:00:00Z".parse().unwrap();

    docs.create(&older).await.unwrap();
    docs.create(&newer).await.unwrap();
    docs.create(&middle).await.unwrap();

    let all: Vec<Project> = docs.list().await.unwrap();
    let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "middle", "older"]);
}

#[tokio::test]
async fn test_list_caps_result_size() {
    let docs = documents();

    for i in 0..(LIST_CAP + 5) {
        let message = ContactMessage::new(ContactMessageCreate {
            name: format!("visitor-{i}"),
            email: "v@example.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        });
        docs.create(&message).await.unwrap();
    }

    let all: Vec<ContactMessage> = docs.list().await.unwrap();
    assert_eq!(all.len(), LIST_CAP as usize);
}

#[tokio::test]
async fn test_list_where_filters_by_field() {
    let docs = documents();
    let album_a = sample_album("A");
    let album_b = sample_album("B");
    docs.create(&album_a).await.unwrap();
    docs.create(&album_b).await.unwrap();

    docs.create(&sample_media("a1", album_a.id)).await.unwrap();
    docs.create(&sample_media("a2", album_a.id)).await.unwrap();
    docs.create(&sample_media("b1", album_b.id)).await.unwrap();

    let of_a: Vec<MediaImage> = docs
        .list_where("albumId", &album_a.id.to_string())
        .await
        .unwrap();
    assert_eq!(of_a.len(), 2);
    assert!(of_a.iter().all(|m| m.album_id == album_a.id));
}

#[tokio::test]
async fn test_replace_updates_in_place() {
    let docs = documents();
    let review = Review::new(ReviewCreate {
        name: "Mara".to_string(),
        role: "Client".to_string(),
        content: "Good".to_string(),
        rating: 4,
    });
    docs.create(&review).await.unwrap();

    let updated = review.replaced_with(ReviewCreate {
        name: "Mara".to_string(),
        role: "Client".to_string(),
        content: "Excellent".to_string(),
        rating: 5,
    });
    assert!(docs.replace(&updated).await.unwrap());

    let fetched: Review = docs.get(review.id).await.unwrap().unwrap();
    assert_eq!(fetched.rating, 5);
    assert_eq!(fetched.content, "Excellent");
    // Identity and date survive the replace.
    assert_eq!(fetched.id, review.id);
    assert_eq!(fetched.date, review.date);
}

#[tokio::test]
async fn test_replace_missing_returns_false() {
    let docs = documents();
    let project = sample_project("never stored");
    assert!(!docs.replace(&project).await.unwrap());
}

#[tokio::test]
async fn test_delete_reports_misses() {
    let docs = documents();
    let project = sample_project("to delete");
    docs.create(&project).await.unwrap();

    // First delete hits, second reports the miss.
    assert!(docs.delete::<Project>(project.id).await.unwrap());
    assert!(!docs.delete::<Project>(project.id).await.unwrap());
}

// --- Album Cascade ---

#[tokio::test]
async fn test_delete_album_cascades_to_media() {
    let docs = documents();
    let album = sample_album("Travel");
    let other = sample_album("Food");
    docs.create(&album).await.unwrap();
    docs.create(&other).await.unwrap();

    docs.create(&sample_media("t1", album.id)).await.unwrap();
    docs.create(&sample_media("t2", album.id)).await.unwrap();
    docs.create(&sample_media("f1", other.id)).await.unwrap();

    assert!(docs.delete_album(album.id).await.unwrap());

    // The album and exactly its own media are gone.
    assert!(docs.get::<Album>(album.id).await.unwrap().is_none());
    let remaining: Vec<MediaImage> = docs.list().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].album_id, other.id);
}

#[tokio::test]
async fn test_delete_missing_album_deletes_nothing() {
    let docs = documents();
    let album = sample_album("Kept");
    docs.create(&album).await.unwrap();
    docs.create(&sample_media("kept", album.id)).await.unwrap();

    assert!(!docs.delete_album(Uuid::new_v4()).await.unwrap());

    // Nothing was touched by the miss.
    assert!(docs.get::<Album>(album.id).await.unwrap().is_some());
    let media: Vec<MediaImage> = docs.list().await.unwrap();
    assert_eq!(media.len(), 1);
}

// --- Profile Singleton ---

#[tokio::test]
async fn test_profile_defaults_before_first_write() {
    let docs = documents();
    let profile = docs.profile().await.unwrap();
    assert_eq!(profile.name, Profile::default().name);
}

#[tokio::test]
async fn test_replace_profile_is_a_singleton_write() {
    let docs = documents();

    let mut first = Profile::default();
    first.name = "First Owner".to_string();
    docs.replace_profile(&first).await.unwrap();

    let mut second = Profile::default();
    second.name = "Second Owner".to_string();
    docs.replace_profile(&second).await.unwrap();

    // Only the latest write survives; repeat writes never accumulate.
    let profile = docs.profile().await.unwrap();
    assert_eq!(profile.name, "Second Owner");
}
