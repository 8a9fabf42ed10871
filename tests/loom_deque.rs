#![cfg(feature = "loom")]

use loom::sync::Arc;
use loom::sync::atomic::{AtomicBool, Ordering};
use loom::thread;
use std::num::NonZero;
use syncring::{BlockingDeque, FullPolicy};

#[test]
fn test_blocking_push_waits_for_pop_loom() {
    loom::model(|| {
        let deque = Arc::new(BlockingDeque::new(NonZero::new(1).unwrap(), FullPolicy::Block));
        let pushed = Arc::new(AtomicBool::new(false));
        deque.push_back(1);

        let producer = {
            let deque = deque.clone();
            let pushed = pushed.clone();
            thread::spawn(move || {
                // Full: must wait for the pop below
                assert_eq!(deque.push_back(2), None);
                pushed.store(true, Ordering::SeqCst);
            })
        };

        // Nothing has popped yet, so the producer cannot have finished
        assert!(!pushed.load(Ordering::SeqCst));
        assert_eq!(deque.pop_front(), 1);
        assert_eq!(deque.pop_front(), 2);
        producer.join().unwrap();
        assert!(deque.is_empty());
    });
}

#[test]
fn test_pop_both_ends_loom() {
    loom::model(|| {
        let deque = Arc::new(BlockingDeque::new(NonZero::new(2).unwrap(), FullPolicy::Block));

        let consumer = {
            let deque = deque.clone();
            thread::spawn(move || deque.pop_back())
        };

        deque.push_front(10);
        deque.push_front(20);
        let first = consumer.join().unwrap();
        let second = deque.pop_front();

        let mut seen = [first, second];
        seen.sort_unstable();
        assert_eq!(seen, [10, 20]);
    });
}

#[test]
fn test_overwrite_keeps_newest_loom() {
    loom::model(|| {
        let deque = Arc::new(BlockingDeque::new(
            NonZero::new(1).unwrap(),
            FullPolicy::OverwriteOldest,
        ));

        let producer = {
            let deque = deque.clone();
            thread::spawn(move || deque.push_back(1))
        };

        let displaced = deque.push_back(2);
        let evicted_by_producer = producer.join().unwrap();

        // Exactly one of the two pushes displaced the other value
        let remaining = deque.pop_front();
        match (displaced, evicted_by_producer) {
            (Some(1), None) => assert_eq!(remaining, 2),
            (None, Some(2)) => assert_eq!(remaining, 1),
            other => panic!("unexpected evictions {other:?}"),
        }
    });
}
