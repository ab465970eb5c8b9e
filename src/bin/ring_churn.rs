use primcoll::SpinRingBuffer;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

fn main() {
    const NUM_THREADS: u64 = 64;

    let keep_running = Arc::new(AtomicBool::new(true));
    let buffer = Arc::new(SpinRingBuffer::new(256));
    let put = Arc::new(AtomicU64::new(0));
    let taken = Arc::new(AtomicU64::new(0));

    let threads: Vec<_> = (0..NUM_THREADS)
        .map(|i| {
            let keep_running = keep_running.clone();
            let buffer = buffer.clone();
            let put = put.clone();
            let taken = taken.clone();

            thread::spawn(move || {
                while keep_running.load(Ordering::Relaxed) {
                    if i % 2 == 0 {
                        if buffer.put_multithreaded(i + 1) {
                            put.fetch_add(1, Ordering::Relaxed);
                        }
                    } else if buffer.get_multithreaded(0) != 0 {
                        taken.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_secs(5));
    keep_running.store(false, Ordering::Relaxed);

    let results = threads.into_iter().map(|t| t.join());

    for result in results.into_iter() {
        assert!(result.is_ok());
    }

    let put = put.load(Ordering::Relaxed);
    let taken = taken.load(Ordering::Relaxed);
    let remaining = buffer.len_multithreaded() as u64;

    assert_eq!(put, taken + remaining);

    println!("{} values put, {} taken, {} left", put, taken, remaining);
}
