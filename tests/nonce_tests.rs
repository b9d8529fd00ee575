/// Unit tests for per-actor nonce allocation.
use tradewire_sdk::nonce::*;

#[test]
fn test_counter_within_one_second() {
    let clock = ManualClock::new(1_700_000_000);
    let mut nonces = NonceAllocator::with_clock(clock);

    assert_eq!(nonces.next_nonce(), 0);
    assert_eq!(nonces.next_nonce(), 1);
    assert_eq!(nonces.next_nonce(), 2);
    assert_eq!(nonces.state(), Some((1_700_000_000, 2)));
}

#[test]
fn test_counter_resets_on_new_second() {
    let clock = ManualClock::new(1_700_000_000);
    let mut nonces = NonceAllocator::with_clock(clock.clone());

    assert_eq!(nonces.next_nonce(), 0);
    assert_eq!(nonces.next_nonce(), 1);

    clock.advance(1);
    let stamp = nonces.next_stamp();
    assert_eq!(
        stamp,
        NonceStamp {
            timestamp: 1_700_000_001,
            nonce: 0
        }
    );
    assert_eq!(nonces.next_nonce(), 1);
}

#[test]
fn test_stamp_carries_clock_second() {
    let clock = ManualClock::new(42);
    let mut nonces = NonceAllocator::with_clock(clock.clone());
    assert_eq!(nonces.next_stamp().timestamp, 42);

    clock.set(100);
    assert_eq!(nonces.next_stamp().timestamp, 100);
}

#[test]
fn test_clock_rollback_resets_counter() {
    let clock = ManualClock::new(500);
    let mut nonces = NonceAllocator::with_clock(clock.clone());
    nonces.next_nonce();
    nonces.next_nonce();

    clock.set(499);
    assert_eq!(nonces.next_stamp(), NonceStamp { timestamp: 499, nonce: 0 });
}

#[test]
fn test_fresh_allocator_has_no_state() {
    let nonces = NonceAllocator::with_clock(ManualClock::new(0));
    assert_eq!(nonces.state(), None);
}

#[test]
fn test_allocators_are_independent() {
    let clock = ManualClock::new(10);
    let mut wallet = NonceAllocator::with_clock(clock.clone());
    let mut session = NonceAllocator::with_clock(clock);

    assert_eq!(wallet.next_nonce(), 0);
    assert_eq!(wallet.next_nonce(), 1);
    assert_eq!(session.next_nonce(), 0);
}

#[test]
fn test_system_clock_is_recent() {
    // 2023-01-01T00:00:00Z
    assert!(SystemClock.now_secs() > 1_672_531_200);
}
