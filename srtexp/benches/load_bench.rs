use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use srtexp::config::{CollectorConfigBuilder, ConfigLoader, ConfigStore};
use srtexp::port::MockPortProbe;

const OBJECT_COUNTS: &[usize] = &[10, 100, 500];

// Half the objects name a port, half are allocated.
fn document(objects: usize) -> String {
    let mut doc = String::from(
        "ip: 127.0.0.1\nportMin: 20000\nportMax: 29999\ncollector:\n  mode: collect_periodically\nobjects:\n",
    );
    for i in 0..objects {
        doc.push_str(&format!("  - name: obj{i}\n"));
        if i % 2 == 0 {
            doc.push_str(&format!("    port: {}\n", 30000 + i));
        }
        if i % 3 == 0 {
            doc.push_str("    collector:\n      filterMode: SRT_SOURCE\n");
        }
    }
    doc
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_str");
    for &count in OBJECT_COUNTS {
        let doc = document(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &doc, |b, doc| {
            b.iter(|| {
                let mut store = ConfigStore::with_probe(MockPortProbe::empty());
                store.load_str(black_box(doc));
                black_box(store.objects().len())
            });
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for &count in OBJECT_COUNTS {
        let mut store = ConfigStore::with_probe(MockPortProbe::empty());
        store.load_str(&document(count));
        let last = format!("obj{}", count - 1);

        group.bench_with_input(BenchmarkId::from_parameter(count), &last, |b, name| {
            b.iter(|| black_box(store.collector_config(black_box(name))));
        });
    }
    group.finish();
}

fn bench_collector_build(c: &mut Criterion) {
    let node = ConfigLoader::parse_str(
        "mode: receive_passively\nfilterMode: blacklist\nvariables: [msTimeStamp, msRTT]\nlabels:\n  - name: site\n    value: tokyo\n",
    )
    .expect("benchmark document must parse");
    let builder = CollectorConfigBuilder::new();

    c.bench_function("collector_build", |b| {
        b.iter(|| black_box(builder.build(Some(black_box(&node)))));
    });
}

criterion_group!(benches, bench_load, bench_lookup, bench_collector_build);
criterion_main!(benches);
