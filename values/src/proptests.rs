use crate::ValueStore;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_int_round_trip(value in any::<i64>()) {
        let store = ValueStore::new();
        store.set_value("key", value).unwrap();
        prop_assert_eq!(store.get_int_value("key", 0), value);
    }

    #[test]
    fn test_string_stored_verbatim(value in "\\PC*") {
        let store = ValueStore::new();
        store.set_value("key", value.as_str()).unwrap();
        prop_assert_eq!(store.get_value("key", "default"), value);
    }

    #[test]
    fn test_lt_never_reaches_bound(value in any::<i64>(), bound in any::<i64>()) {
        let store = ValueStore::new();
        store.set_value("key", value).unwrap();
        let read = store.get_int_value_lt("key", bound);
        prop_assert!(read <= bound);
        prop_assert_eq!(read, value.min(bound));
    }

    #[test]
    fn test_gt_never_below_bound(value in any::<i64>(), bound in any::<i64>()) {
        let store = ValueStore::new();
        store.set_value("key", value).unwrap();
        prop_assert_eq!(store.get_int_value_gt("key", bound), value.max(bound));
        prop_assert_eq!(store.get_int_value_gte("key", bound), value.max(bound));
        prop_assert_eq!(store.get_int_value_lte("key", bound), value.min(bound));
    }

    #[test]
    fn test_string_list_round_trip(values in proptest::collection::vec("\\PC*", 0..8)) {
        let store = ValueStore::new();
        store.set_value("key", values.clone()).unwrap();
        prop_assert_eq!(store.get_string_slice_value("key", vec![]), values);
    }
}
