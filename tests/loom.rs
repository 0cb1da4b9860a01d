#![allow(missing_docs)]
#![cfg(feature = "loom")]

use loom::{
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};
use loop_tree::sync::{Gate, Latch};
use std::sync::Arc;

#[test]
fn loom_latch_wait_acquires_completion() {
    loom::model(|| {
        let latch = Arc::new(Latch::new());
        let data = Arc::new(AtomicUsize::new(0));

        let worker = {
            let latch = Arc::clone(&latch);
            let data = Arc::clone(&data);
            thread::spawn(move || {
                // Publish, then signal; the waiter below must observe the
                // relaxed write through the latch alone.
                data.store(42, Ordering::Relaxed);
                latch.set();
            })
        };

        latch.wait();
        assert_eq!(data.load(Ordering::Relaxed), 42);

        worker.join().unwrap();
        assert!(latch.is_set());
        // Waiting again returns immediately.
        latch.wait();
    });
}

#[test]
fn loom_subscribe_races_with_set() {
    loom::model(|| {
        let latch = Arc::new(Latch::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let gate = Gate::new(1, {
            let fired = Arc::clone(&fired);
            move || {
                fired.fetch_add(1, Ordering::Relaxed);
            }
        });

        let setter = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || latch.set())
        };
        // Whichever side wins the race, the gate must fire exactly once.
        latch.subscribe(gate);
        setter.join().unwrap();

        latch.wait();
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    });
}

#[test]
fn loom_gate_joins_two_producers() {
    loom::model(|| {
        let first = Arc::new(Latch::new());
        let second = Arc::new(Latch::new());
        let outputs = Arc::new([AtomicUsize::new(0), AtomicUsize::new(0)]);
        let joined = Arc::new(AtomicUsize::new(0));

        // The continuation of the final arrival must see both producers'
        // outputs, whichever producer comes in last.
        let gate = Gate::new(2, {
            let outputs = Arc::clone(&outputs);
            let joined = Arc::clone(&joined);
            move || {
                assert_eq!(outputs[0].load(Ordering::Relaxed), 1);
                assert_eq!(outputs[1].load(Ordering::Relaxed), 1);
                joined.fetch_add(1, Ordering::Relaxed);
            }
        });
        first.subscribe(Arc::clone(&gate));
        second.subscribe(gate);

        let producers = [
            {
                let first = Arc::clone(&first);
                let outputs = Arc::clone(&outputs);
                thread::spawn(move || {
                    outputs[0].store(1, Ordering::Relaxed);
                    first.set();
                })
            },
            {
                let second = Arc::clone(&second);
                let outputs = Arc::clone(&outputs);
                thread::spawn(move || {
                    outputs[1].store(1, Ordering::Relaxed);
                    second.set();
                })
            },
        ];
        for producer in producers {
            producer.join().unwrap();
        }

        first.wait();
        second.wait();
        assert_eq!(joined.load(Ordering::Relaxed), 1);
    });
}
