use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::{Array2, Array3};
use neuroconn::{clean_connectome, map_rois, overlap_labels, AtlasCorrection, Lut};

fn synthetic_atlas() -> Array3<i32> {
    Array3::from_shape_fn((91, 109, 91), |(x, y, z)| ((x / 8) * 100 + (y / 8) * 10 + z / 8) as i32 % 281)
}

fn synthetic_mask() -> Array3<f32> {
    Array3::from_shape_fn((91, 109, 91), |(x, y, z)| if x > 30 && x < 60 && y > 40 && z < 50 { 1.0 } else { 0.0 })
}

fn synthetic_lut() -> Lut {
    Lut {
        label: (1..=280).collect(),
        name: (1..=280).map(|l| format!("GM_Area_{}", l)).collect(),
    }
}

fn bench_mapping(c: &mut Criterion) {
    let atlas = synthetic_atlas();
    let mask = synthetic_mask();
    let lut = synthetic_lut();

    c.bench_function("overlap_labels", |b| {
        b.iter(|| overlap_labels(black_box(&atlas), black_box(&mask)).unwrap())
    });
    c.bench_function("map_rois", |b| {
        b.iter(|| map_rois(black_box(&atlas), black_box(&mask), black_box(&lut)).unwrap())
    });
}

fn bench_cleaning(c: &mut Criterion) {
    let cc = Array2::from_shape_fn((414, 414), |(i, j)| (i * 414 + j) as f64);
    let correction = AtlasCorrection::juelich();

    c.bench_function("clean_connectome", |b| {
        b.iter(|| clean_connectome(black_box(&cc), black_box(&correction)).unwrap())
    });
}

criterion_group!(benches, bench_mapping, bench_cleaning);
criterion_main!(benches);
