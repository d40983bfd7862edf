use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use tree_list::TreeList;

fn push_back(b: &mut Bencher<'_>) {
    b.iter(|| {
        let mut list = TreeList::new();
        for i in 0..1000 {
            list.push_back(i);
        }
        black_box(list)
    })
}

fn insert_random(b: &mut Bencher<'_>) {
    b.iter(|| {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut list = TreeList::new();
        for i in 0..1000usize {
            let at = rng.random_range(0..=i);
            list.insert(at, i);
        }
        black_box(list)
    })
}

fn get_random(b: &mut Bencher<'_>) {
    let list: TreeList<usize> = (0..1000).collect();
    let mut rng = SmallRng::seed_from_u64(2);
    b.iter(|| {
        let at = rng.random_range(0..1000);
        black_box(list.get(at))
    })
}

fn iterate(b: &mut Bencher<'_>) {
    let list: TreeList<usize> = (0..1000).collect();
    b.iter(|| black_box(list.iter().sum::<usize>()))
}

fn from_vec(b: &mut Bencher<'_>) {
    let source: Vec<usize> = (0..1000).collect();
    b.iter(|| black_box(TreeList::from(source.clone())))
}

fn concat(b: &mut Bencher<'_>) {
    let left: TreeList<usize> = (0..1000).collect();
    let right: TreeList<usize> = (1000..2000).collect();
    b.iter(|| {
        let merged = TreeList::concat(left.clone(), right.clone());
        black_box(merged)
    })
}

fn benches(c: &mut Criterion) {
    c.bench_function("push_back_1000", push_back);
    c.bench_function("insert_random_1000", insert_random);
    c.bench_function("get_random_1000", get_random);
    c.bench_function("iterate_1000", iterate);
    c.bench_function("from_vec_1000", from_vec);
    c.bench_function("concat_1000_1000", concat);
}

criterion_group!(list_benches, benches);
criterion_main!(list_benches);
