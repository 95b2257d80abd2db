//! Build and lookup scaling over two hierarchy shapes: a deep hierarchy with few children at
//! each branch point, and a shallow one with large numbers of children.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use pathmatcher::PathMatcher;

const NOUNS: &[&str] = &[
    "Anchor", "Beacon", "Crate", "Dome", "Fence", "Girder", "Hatch", "Lantern", "Mast", "Panel",
    "Pillar", "Ramp", "Spire", "Turbine", "Valve",
];

const ADJECTIVES: &[&str] = &[
    "old", "bent", "bright", "dim", "inner", "outer", "spare", "tall", "worn", "painted",
];

fn generate_paths(
    seed: u64,
    depth_range: (usize, usize),
    children_range: (usize, usize),
) -> Vec<String> {
    fn build_walk(
        rng: &mut StdRng,
        depth_range: (usize, usize),
        children_range: (usize, usize),
        parent: &str,
        depth: usize,
        paths: &mut Vec<String>,
    ) {
        if depth > rng.gen_range(depth_range.0..=depth_range.1) {
            return;
        }
        for i in 0..rng.gen_range(children_range.0..=children_range.1) {
            let path = format!(
                "{}/{}{}{}",
                parent,
                ADJECTIVES.choose(rng).unwrap(),
                NOUNS.choose(rng).unwrap(),
                i
            );
            paths.push(path.clone());
            build_walk(rng, depth_range, children_range, &path, depth + 1, paths);
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut paths = Vec::new();
    build_walk(&mut rng, depth_range, children_range, "", 1, &mut paths);
    paths
}

fn bench_hierarchy(c: &mut Criterion, name: &str, paths: &[String]) {
    c.bench_function(&format!("build {} ({} paths)", name, paths.len()), |b| {
        b.iter(|| black_box(paths.iter().collect::<PathMatcher>()))
    });

    let matcher: PathMatcher = paths.iter().collect();
    c.bench_function(&format!("lookup {} ({} paths)", name, paths.len()), |b| {
        b.iter(|| {
            for path in paths {
                black_box(matcher.matches(path));
            }
        })
    });
}

fn lookup_scaling(c: &mut Criterion) {
    let deep = generate_paths(10, (3, 8), (2, 3));
    bench_hierarchy(c, "deep", &deep);

    let shallow = generate_paths(10, (2, 2), (100, 200));
    bench_hierarchy(c, "shallow", &shallow);
}

criterion_group!(benches, lookup_scaling);
criterion_main!(benches);
