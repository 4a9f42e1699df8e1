//! Multi-threaded producer/consumer scenarios

use esox_workpool::{NotifyPolicy, PoolConfiguration, PoolError, WorkPool};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[test]
fn two_threads_single_handoff() {
    let pool = WorkPool::bounded(1);

    crossbeam::thread::scope(|s| {
        s.spawn(|_| pool.push(9));
        s.spawn(|_| assert_eq!(pool.pop().unwrap(), 9));
    })
    .unwrap();
}

#[test]
fn hundred_items_arrive_in_order() {
    let pool = WorkPool::bounded(777);

    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            for i in 0..100 {
                pool.push(i + 9);
            }
        });
        s.spawn(|_| {
            for i in 0..100 {
                assert_eq!(pool.pop().unwrap(), i + 9);
            }
        });
    })
    .unwrap();
}

#[test]
fn push_blocks_at_capacity() {
    let pool = WorkPool::bounded(3);
    let unblocked = AtomicBool::new(false);

    pool.push(1);
    pool.push(2);
    pool.push(3);

    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            pool.push(4);
            unblocked.store(true, Ordering::SeqCst);
        });

        // The fourth push must stay blocked while the buffer is full.
        thread::sleep(Duration::from_millis(100));
        assert!(!unblocked.load(Ordering::SeqCst));
        assert_eq!(pool.len(), 3);

        assert_eq!(pool.pop().unwrap(), 1);
    })
    .unwrap();

    assert!(unblocked.load(Ordering::SeqCst));
    assert_eq!(pool.len(), 3);
}

#[test]
fn blocked_consumer_receives_termination() {
    let pool: WorkPool<i32> = WorkPool::bounded(777);

    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            loop {
                match pool.pop() {
                    Ok(_) => {}
                    Err(PoolError::Terminated) => break,
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        });

        pool.register_terminator();
        pool.start();
        pool.terminate();
    })
    .unwrap();
}

#[test]
fn twenty_five_consumers_drain_everything() {
    let pool = WorkPool::bounded(777);
    let total = AtomicUsize::new(0);

    crossbeam::thread::scope(|s| {
        for _ in 0..25 {
            let pool = &pool;
            let total = &total;
            s.spawn(move |_| {
                loop {
                    match pool.pop() {
                        Ok(_) => {
                            total.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(PoolError::Terminated) => break,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            });
        }

        pool.register_terminator();
        pool.start();

        for i in 0..10_000 {
            pool.push(i + 99);
        }

        pool.terminate();
    })
    .unwrap();

    assert_eq!(total.load(Ordering::Relaxed), 10_000);
}

#[test]
fn multiple_producers_each_vote() {
    let pool = WorkPool::bounded(777);
    let total = AtomicUsize::new(0);

    pool.register_terminator();
    pool.register_terminator();
    pool.register_terminator();
    pool.start();

    crossbeam::thread::scope(|s| {
        for p in 0..3 {
            let pool = &pool;
            s.spawn(move |_| {
                for i in 0..100 {
                    pool.push(p * 1_000 + i);
                }
                pool.terminate();
            });
        }

        for _ in 0..2 {
            let pool = &pool;
            let total = &total;
            s.spawn(move |_| {
                loop {
                    match pool.pop() {
                        Ok(_) => {
                            total.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(PoolError::Terminated) => break,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(total.load(Ordering::Relaxed), 300);
    assert!(pool.is_terminating());
}

#[test]
fn polling_policy_still_makes_progress() {
    let config = PoolConfiguration::new()
        .with_capacity(2)
        .with_notify_policy(NotifyPolicy::None);
    let pool = WorkPool::new(config);

    // Nobody ever notifies under this policy; both sides must advance on
    // timed re-checks alone.
    crossbeam::thread::scope(|s| {
        s.spawn(|_| {
            for i in 0..20 {
                pool.push(i);
            }
        });
        s.spawn(|_| {
            for i in 0..20 {
                assert_eq!(pool.pop().unwrap(), i);
            }
        });
    })
    .unwrap();
}
