//! SQLite store persistence tests

mod common;

use common::{sqlite_store, trip};
use tempfile::TempDir;
use tripmatch_core::{
    catalog, CatalogStore, FeedbackEvent, SqliteStore, TravelType, TripId, TripmatchError,
};

#[tokio::test]
async fn test_catalog_and_feedback_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("catalog.db");

    {
        let store = SqliteStore::open(&path).await.unwrap();
        let report = catalog::seed_demo(&store).await.unwrap();
        assert_eq!(report.trips, 13);
    }

    let store = SqliteStore::open(&path).await.unwrap();
    assert_eq!(store.count_trips().await.unwrap(), 13);

    let ladakh = store.get_trip(TripId(11)).await.unwrap().unwrap();
    assert_eq!(ladakh.destination, "Ladakh");
    assert_eq!(ladakh.days, 10);
    assert_eq!(ladakh.itinerary.len(), 10);
    assert!(ladakh.interests.contains("road trip"));

    let shimla = store.aggregate_for(TripId(2)).await.unwrap();
    assert_eq!(shimla.dislike_count, 1);

    let events = store.recent_feedback(TripId(2), 5).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].comment.as_deref(), Some("Too crowded during season"));
}

#[tokio::test]
async fn test_snapshot_is_ordered_by_id() {
    let (store, _dir) = sqlite_store().await;
    for id in [5, 2, 9] {
        store
            .insert_trip(trip(id, 1000.0, 3, TravelType::Family))
            .await
            .unwrap();
    }

    let ids: Vec<TripId> = store
        .snapshot()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.trip.id)
        .collect();
    assert_eq!(ids, vec![TripId(2), TripId(5), TripId(9)]);
}

#[tokio::test]
async fn test_recent_feedback_newest_first() {
    let (store, _dir) = sqlite_store().await;
    store
        .insert_trip(trip(1, 1000.0, 3, TravelType::Family))
        .await
        .unwrap();

    for rating in 1..=4u8 {
        store
            .apply_feedback(&FeedbackEvent {
                trip_id: TripId(1),
                user_id: None,
                rating,
                liked: rating > 2,
                comment: None,
                timestamp: chrono::Utc::now(),
            })
            .await
            .unwrap();
    }

    let ratings: Vec<u8> = store
        .recent_feedback(TripId(1), 3)
        .await
        .unwrap()
        .iter()
        .map(|e| e.rating)
        .collect();
    assert_eq!(ratings, vec![4, 3, 2]);
}

#[tokio::test]
async fn test_duplicate_trip_id_rejected() {
    let (store, _dir) = sqlite_store().await;
    store
        .insert_trip(trip(1, 1000.0, 3, TravelType::Family))
        .await
        .unwrap();

    let result = store
        .insert_trip(trip(1, 2000.0, 4, TravelType::Family))
        .await;
    assert!(result.is_err());
    assert_eq!(store.count_trips().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_trip_lookups() {
    let (store, _dir) = sqlite_store().await;
    assert!(store.get_trip(TripId(3)).await.unwrap().is_none());
    assert!(matches!(
        store.aggregate_for(TripId(3)).await,
        Err(TripmatchError::UnknownTrip(TripId(3)))
    ));
}
