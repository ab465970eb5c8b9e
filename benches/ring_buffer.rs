use primcoll::SpinRingBuffer;

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use criterion::{criterion_group, criterion_main, Criterion};
use parking_lot::Mutex;

const CAPACITY: usize = 1024;

struct MutexRingBuffer<T> {
    queue: Mutex<VecDeque<T>>,
}

impl<T> MutexRingBuffer<T> {
    fn new() -> MutexRingBuffer<T> {
        MutexRingBuffer {
            queue: Mutex::new(VecDeque::with_capacity(CAPACITY)),
        }
    }

    fn put(&self, value: T) -> bool {
        let mut guard = self.queue.lock();

        if guard.len() == CAPACITY {
            return false;
        }

        guard.push_back(value);

        true
    }

    fn get(&self, default: T) -> T {
        self.queue.lock().pop_front().unwrap_or(default)
    }
}

fn bench_single_thread(c: &mut Criterion) {
    let spin = SpinRingBuffer::new(CAPACITY);
    let mutex = MutexRingBuffer::new();

    c.bench_function("spin ring buffer: single threaded put/get", |b| {
        b.iter(|| {
            spin.put_multithreaded(criterion::black_box(5u64));
            spin.get_multithreaded(0)
        })
    });

    c.bench_function("parking_lot ring buffer: single threaded put/get", |b| {
        b.iter(|| {
            mutex.put(criterion::black_box(5u64));
            mutex.get(0)
        })
    });
}

fn bench_contended(c: &mut Criterion) {
    let num_threads = num_cpus::get();

    let spin = Arc::new(SpinRingBuffer::new(CAPACITY));
    let keep_going = Arc::new(AtomicBool::new(true));

    let threads: Vec<_> = (0..num_threads - 1)
        .map(|i| {
            let spin = spin.clone();
            let keep_going = keep_going.clone();

            thread::spawn(move || {
                while keep_going.load(Ordering::SeqCst) {
                    if i % 2 == 0 {
                        spin.put_multithreaded(criterion::black_box(i as u64));
                    } else {
                        spin.get_multithreaded(0);
                    }
                }
            })
        })
        .collect();

    c.bench_function("spin ring buffer: contended put/get", move |b| {
        b.iter(|| {
            spin.put_multithreaded(criterion::black_box(1u64));
            spin.get_multithreaded(0)
        })
    });

    keep_going.store(false, Ordering::SeqCst);

    let _: Vec<_> = threads.into_iter().map(|t| t.join()).collect();

    let mutex = Arc::new(MutexRingBuffer::new());
    let keep_going = Arc::new(AtomicBool::new(true));

    let threads: Vec<_> = (0..num_threads - 1)
        .map(|i| {
            let mutex = mutex.clone();
            let keep_going = keep_going.clone();

            thread::spawn(move || {
                while keep_going.load(Ordering::SeqCst) {
                    if i % 2 == 0 {
                        mutex.put(criterion::black_box(i as u64));
                    } else {
                        mutex.get(0);
                    }
                }
            })
        })
        .collect();

    c.bench_function("parking_lot ring buffer: contended put/get", move |b| {
        b.iter(|| {
            mutex.put(criterion::black_box(1u64));
            mutex.get(0)
        })
    });

    keep_going.store(false, Ordering::SeqCst);

    let _: Vec<_> = threads.into_iter().map(|t| t.join()).collect();
}

criterion_group!(benches, bench_single_thread, bench_contended);
criterion_main!(benches);
