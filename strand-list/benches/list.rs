//! Benchmarks for list operations.
//!
//! Compares strand-list against std's LinkedList and VecDeque where they
//! offer the same operation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::{LinkedList, VecDeque};
use strand_list::{BoxedListStorage, List, OwnedList, SlabListStorage};

type Boxed = BoxedListStorage<u64>;

// ============================================================================
// Push / pop
// ============================================================================

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    group.bench_function("strand_boxed", |b| {
        let mut storage = Boxed::with_capacity(1024);
        let mut list: List<u64, Boxed> = List::new();
        b.iter(|| {
            list.try_push_back(&mut storage, black_box(42)).unwrap();
            black_box(list.pop_front(&mut storage).unwrap())
        });
    });

    group.bench_function("strand_owned", |b| {
        let mut list = OwnedList::with_capacity(1024);
        b.iter(|| {
            list.push_back(black_box(42u64));
            black_box(list.pop_front().unwrap())
        });
    });

    group.bench_function("std_linked_list", |b| {
        let mut list = LinkedList::new();
        b.iter(|| {
            list.push_back(black_box(42u64));
            black_box(list.pop_front().unwrap())
        });
    });

    group.bench_function("std_vecdeque", |b| {
        let mut deque = VecDeque::with_capacity(1024);
        b.iter(|| {
            deque.push_back(black_box(42u64));
            black_box(deque.pop_front().unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Insert / erase in the middle through a held position
// ============================================================================

fn bench_insert_erase_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_erase_middle");

    for size in [16usize, 1024] {
        group.bench_with_input(BenchmarkId::new("strand_boxed", size), &size, |b, &size| {
            let mut storage = Boxed::with_capacity(size + 1);
            let mut list: List<u64, Boxed> = List::new();
            for i in 0..size as u64 {
                list.try_push_back(&mut storage, i).unwrap();
            }
            let middle = list.positions(&storage).nth(size / 2).unwrap();

            b.iter(|| {
                let pos = list.try_insert(&mut storage, middle, black_box(7)).unwrap();
                black_box(list.erase(&mut storage, pos))
            });
        });

        group.bench_with_input(BenchmarkId::new("std_vecdeque", size), &size, |b, &size| {
            let mut deque: VecDeque<u64> = (0..size as u64).collect();
            b.iter(|| {
                deque.insert(size / 2, black_box(7));
                black_box(deque.remove(size / 2))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Splice
// ============================================================================

fn bench_splice(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_split_off");

    for size in [16usize, 1024] {
        group.bench_with_input(BenchmarkId::new("strand_slab", size), &size, |b, &size| {
            let mut storage: SlabListStorage<u64> = slab::Slab::with_capacity(size * 2);
            let mut a: List<u64, SlabListStorage<u64>, usize> =
                List::from_iter_in(&mut storage, 0..size as u64);
            let mut b_list: List<u64, SlabListStorage<u64>, usize> =
                List::from_iter_in(&mut storage, 0..size as u64);

            b.iter(|| {
                let first = b_list.begin(&storage);
                a.append(&mut storage, &mut b_list);
                b_list = a.split_off(&mut storage, first);
                black_box(b_list.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("std_linked_list", size), &size, |b, &size| {
            let mut a: LinkedList<u64> = (0..size as u64).collect();
            let mut other: LinkedList<u64> = (0..size as u64).collect();

            b.iter(|| {
                a.append(&mut other);
                other = a.split_off(size);
                black_box(other.len())
            });
        });
    }

    group.finish();
}

// ============================================================================
// Reverse
// ============================================================================

fn bench_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse");

    group.bench_function("strand_owned/1024", |b| {
        let mut list: OwnedList<u64> = (0..1024).collect();
        b.iter(|| {
            list.reverse();
            black_box(list.front().copied())
        });
    });

    group.bench_function("std_vecdeque/1024", |b| {
        let mut deque: VecDeque<u64> = (0..1024).collect();
        b.iter(|| {
            deque.make_contiguous().reverse();
            black_box(deque.front().copied())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_push_pop,
    bench_insert_erase_middle,
    bench_splice,
    bench_reverse
);
criterion_main!(benches);
