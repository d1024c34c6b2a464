extern crate gloss;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use gloss::sched::{self, TaskQueue};

#[test]
fn fifo() {
    let queue = TaskQueue::new();
    let record = Arc::new(Mutex::new(Vec::new()));

    for i in 0..8 {
        let record = record.clone();
        queue.push(move || record.lock().unwrap().push(i));
    }

    assert_eq!(queue.len(), 8);
    assert_eq!(queue.execute(), 8);
    assert!(queue.is_empty());
    assert_eq!(*record.lock().unwrap(), (0..8).collect::<Vec<_>>());
}

#[test]
fn panics_are_isolated() {
    let queue = TaskQueue::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    queue.push(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    queue.push(|| panic!("boom"));
    let c = counter.clone();
    queue.push(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(queue.execute(), 3);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn nested_pushes_are_deferred() {
    let queue = TaskQueue::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let q = queue.clone();
    let c = counter.clone();
    queue.push(move || {
        let c = c.clone();
        q.push(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
    });

    assert_eq!(queue.execute(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(queue.len(), 1);

    assert_eq!(queue.execute(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn push_from_threads() {
    let queue = TaskQueue::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..16 {
                    let counter = counter.clone();
                    queue.push(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    });
                }
            })
        })
        .collect();

    for v in handles {
        v.join().unwrap();
    }

    assert_eq!(queue.execute(), 64);
    assert_eq!(counter.load(Ordering::SeqCst), 64);
}

#[test]
fn main_thread_is_global() {
    assert!(::std::ptr::eq(sched::main_thread(), sched::main_thread()));
}
