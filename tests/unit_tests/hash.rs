use fenris_fe::hash::{compute_key, fnv_64, hashword, hashword2, hashword2_64, hashword_64};
use proptest::prelude::*;

#[test]
fn fnv_64_reference_values() {
    assert_eq!(fnv_64(b""), 0xcbf29ce484222325);
    assert_eq!(fnv_64(b"a"), 0xaf63bd4c8601b7be);
}

#[test]
fn compute_key_of_small_sets() {
    assert_eq!(compute_key(&[]), 0);
    assert_eq!(compute_key(&[7]), 7);
    assert_eq!(compute_key(&[3, 1, 2]), compute_key(&[2, 3, 1]));
    assert_eq!(compute_key(&[1, 2]), hashword2_64(1, 2));
    assert_ne!(compute_key(&[1, 2]), compute_key(&[1, 3]));
}

proptest! {
    #[test]
    fn hashword2_agrees_with_hashword(a: u32, b: u32, initval: u32) {
        prop_assert_eq!(hashword2(a, b, initval), hashword(&[a, b], initval));
    }

    #[test]
    fn hashword2_64_agrees_with_hashword_64(a: u64, b: u64) {
        prop_assert_eq!(hashword2_64(a, b), hashword_64(&[a, b]));
    }

    #[test]
    fn compute_key_is_independent_of_order(mut ids in prop::collection::vec(0..1000usize, 2..8)) {
        let key = compute_key(&ids);
        ids.reverse();
        prop_assert_eq!(compute_key(&ids), key);
        ids.sort_unstable();
        prop_assert_eq!(compute_key(&ids), key);
    }
}
