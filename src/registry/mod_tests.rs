//! Tests for the subscriber registry and its persistence.

use super::*;

mod subscriber_set {
    use super::*;

    #[test]
    fn subscribe_is_idempotent() {
        let mut set = SubscriberSet::new();
        assert!(set.subscribe(SubscriberId::new(1)));
        assert!(!set.subscribe(SubscriberId::new(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn subscribing_twice_equals_subscribing_once() {
        let mut once = SubscriberSet::new();
        once.subscribe(SubscriberId::new(7));

        let mut twice = SubscriberSet::new();
        twice.subscribe(SubscriberId::new(7));
        twice.subscribe(SubscriberId::new(7));

        assert_eq!(once, twice);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let mut set: SubscriberSet = [1i64, 2].into_iter().collect();
        assert!(set.unsubscribe(SubscriberId::new(1)));
        assert!(!set.unsubscribe(SubscriberId::new(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn unsubscribe_of_absent_id_is_not_an_error() {
        let mut set = SubscriberSet::new();
        assert!(!set.unsubscribe(SubscriberId::new(99)));
        assert!(set.is_empty());
    }

    #[test]
    fn snapshot_is_sorted_and_stable() {
        let set: SubscriberSet = [5i64, -3, 12].into_iter().collect();
        let snapshot = set.snapshot();
        assert_eq!(
            snapshot,
            vec![
                SubscriberId::new(-3),
                SubscriberId::new(5),
                SubscriberId::new(12)
            ]
        );
    }

    #[test]
    fn snapshot_is_unaffected_by_later_mutation() {
        let mut set: SubscriberSet = [1i64, 2, 3].into_iter().collect();
        let snapshot = set.snapshot();
        set.unsubscribe(SubscriberId::new(2));
        assert_eq!(snapshot.len(), 3);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serializes_as_sorted_json_array() {
        let set: SubscriberSet = [42i64, -100_123, 77].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[-100123,42,77]");
    }

    #[test]
    fn subscriber_id_parses_from_str() {
        let id: SubscriberId = "-42".parse().unwrap();
        assert_eq!(id, SubscriberId::new(-42));
        assert!("abc".parse::<SubscriberId>().is_err());
    }
}

mod load_result {
    use super::*;

    #[test]
    fn into_set_returns_loaded_set() {
        let set: SubscriberSet = [1i64].into_iter().collect();
        let result = LoadResult::Loaded(set.clone());
        assert_eq!(result.into_set(), set);
    }

    #[test]
    fn into_set_returns_empty_for_not_found() {
        assert!(LoadResult::NotFound.into_set().is_empty());
    }

    #[test]
    fn into_set_returns_empty_for_corrupted() {
        let result = LoadResult::Corrupted {
            reason: "bad json".to_string(),
        };
        assert!(result.into_set().is_empty());
        assert!(!LoadResult::NotFound.is_loaded());
    }
}

mod file_store {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileRegistryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRegistryStore::new(dir.path().join("subscribers.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let set: SubscriberSet = [3i64, 1, 2].into_iter().collect();

        store.save(&set).await.unwrap();

        match store.load() {
            LoadResult::Loaded(loaded) => assert_eq!(loaded, set),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_content_is_a_sorted_json_array() {
        let (_dir, store) = temp_store();
        let set: SubscriberSet = [9i64, -1, 4].into_iter().collect();

        store.save(&set).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "[-1,4,9]");
    }

    #[test]
    fn load_of_missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.load(), LoadResult::NotFound));
    }

    #[test]
    fn load_of_invalid_json_is_corrupted() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{not json").unwrap();

        match store.load() {
            LoadResult::Corrupted { reason } => assert!(reason.contains("Invalid JSON")),
            other => panic!("expected Corrupted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_overwrites_previous_content() {
        let (_dir, store) = temp_store();
        let first: SubscriberSet = [1i64, 2].into_iter().collect();
        let second: SubscriberSet = [2i64].into_iter().collect();

        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        assert_eq!(store.load().into_set(), second);
    }

    #[tokio::test]
    async fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRegistryStore::new(dir.path().join("nested/state/subscribers.json"));

        store.save(&SubscriberSet::new()).await.unwrap();

        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn no_temp_file_remains_after_save() {
        let (_dir, store) = temp_store();
        store
            .save(&[1i64].into_iter().collect())
            .await
            .unwrap();

        let temp = format!("{}.tmp", store.path().display());
        assert!(!std::path::Path::new(&temp).exists());
    }
}
