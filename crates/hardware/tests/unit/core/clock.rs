//! # Clock Tests

use proptest::prelude::*;
use vmsim_core::core::Clock;

#[test]
fn starts_at_zero() {
    assert_eq!(Clock::new().now(), 0);
    assert_eq!(Clock::default(), Clock::new());
}

#[test]
fn zero_advance_is_a_no_op() {
    let mut clock = Clock::new();
    clock.advance(5);
    clock.advance(0);
    assert_eq!(clock.now(), 5);
}

proptest! {
    /// Time never decreases, whatever is charged.
    #[test]
    fn monotonic(steps in prop::collection::vec(any::<u64>(), 0..64)) {
        let mut clock = Clock::new();
        let mut last = clock.now();
        for dt in steps {
            clock.advance(dt);
            prop_assert!(clock.now() >= last);
            last = clock.now();
        }
    }
}
