use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keyvalues::{binary, from_str, kv, to_string, KvObject};

fn game_info() -> KvObject {
    kv!("GameInfo" => {
        "game" => "Half-Life 2",
        "type" => "singleplayer_only",
        "FileSystem" => {
            "SteamAppId" => 220,
            "SearchPaths" => {
                "game" => "|gameinfo_path|.",
                "platform" => "|all_source_engine_paths|platform",
            },
        },
    })
}

fn wide_tree(entries: usize) -> KvObject {
    KvObject::with_children(
        "Items",
        (0..entries).map(|i| {
            KvObject::with_children(
                format!("item{}", i),
                [
                    KvObject::new("id", i as i32),
                    KvObject::new("name", format!("Item {}", i)),
                    KvObject::new("weight", i as f32 * 0.25),
                    KvObject::new("serial", i as u64 * 1_000_003),
                ],
            )
        }),
    )
}

fn benchmark_text_serialize(c: &mut Criterion) {
    let tree = game_info();
    c.bench_function("text_serialize_small", |b| {
        b.iter(|| to_string(black_box(&tree)))
    });
}

fn benchmark_text_deserialize(c: &mut Criterion) {
    let text = to_string(&game_info()).unwrap();
    c.bench_function("text_deserialize_small", |b| {
        b.iter(|| from_str(black_box(&text)))
    });
}

fn benchmark_binary(c: &mut Criterion) {
    let tree = game_info();
    let bytes = binary::to_vec(&tree).unwrap();
    let (table_bytes, table) = binary::to_vec_with_string_table(&tree).unwrap();

    c.bench_function("binary_serialize_small", |b| {
        b.iter(|| binary::to_vec(black_box(&tree)))
    });
    c.bench_function("binary_deserialize_small", |b| {
        b.iter(|| binary::from_slice(black_box(&bytes)))
    });
    c.bench_function("binary_deserialize_table_small", |b| {
        b.iter(|| binary::from_slice_with_string_table(black_box(&table_bytes), &table))
    });
}

fn benchmark_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [10, 100, 1000].iter() {
        let tree = wide_tree(*size);
        let text = to_string(&tree).unwrap();
        let bytes = binary::to_vec(&tree).unwrap();

        group.bench_with_input(BenchmarkId::new("text_roundtrip", size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)).and_then(|tree| to_string(&tree)))
        });
        group.bench_with_input(BenchmarkId::new("binary_roundtrip", size), &bytes, |b, bytes| {
            b.iter(|| binary::from_slice(black_box(bytes)).and_then(|tree| binary::to_vec(&tree)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_text_serialize,
    benchmark_text_deserialize,
    benchmark_binary,
    benchmark_scaling
);
criterion_main!(benches);
