use meta_store::{MemoryRepository, NodePath, PersistRepository};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_invariants(s in "[a-z/]{0,24}") {
        let path = NodePath::new(&s);
        let as_str = path.as_str();

        prop_assert!(as_str.starts_with('/'));
        prop_assert!(!as_str.contains("//"));
        prop_assert!(path.is_root() || !as_str.ends_with('/'));

        // Normalizing twice changes nothing
        prop_assert_eq!(NodePath::new(as_str), path.clone());
    }

    #[test]
    fn test_children_match_persisted_segments(names in proptest::collection::btree_set("[a-z]{1,6}", 0..8)) {
        let repo = MemoryRepository::new();
        for name in &names {
            repo.persist(&format!("/root/{}/leaf", name), "x").unwrap();
        }
        let children = repo.get_children_keys("/root").unwrap();
        prop_assert_eq!(children, names.into_iter().collect::<Vec<_>>());
    }
}
