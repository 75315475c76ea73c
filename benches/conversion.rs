use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tagson::{ser, ConvertOptions, Converter, Schema};

fn document(objects: usize, fields: usize) -> String {
    let mut out = String::new();
    for o in 0..objects {
        out.push_str(&format!("<object>\n  <obj_name>object_{o}</obj_name>\n"));
        for f in 0..fields {
            let (ty, value) = if f % 2 == 0 {
                ("int", (o * fields + f).to_string())
            } else {
                ("string", format!("value {f}"))
            };
            out.push_str(&format!(
                "  <field>\n    <name>f{f}</name>\n    <type>{ty}</type>\n    \
                 <value>{value}</value>\n  </field>\n"
            ));
        }
        out.push_str("</object>\n");
    }
    out
}

fn benchmark_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    for objects in [10, 100, 1000] {
        let input = document(objects, 8);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(objects), &input, |b, input| {
            b.iter(|| {
                let converter = Converter::bundled().unwrap();
                black_box(converter.convert_str(black_box(input)))
            });
        });
    }
    group.finish();
}

fn benchmark_channel_capacity(c: &mut Criterion) {
    let input = document(200, 8);
    let mut group = c.benchmark_group("channel_capacity");
    for capacity in [1, 16, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let options = ConvertOptions::new().with_channel_capacity(capacity);
                let converter = Converter::new(Schema::bundled().unwrap(), options).unwrap();
                black_box(converter.convert_str(&input))
            });
        });
    }
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let converter = Converter::bundled().unwrap();
    let conversion = converter.convert_str(&document(500, 8));
    let options = ConvertOptions::default();
    c.bench_function("serialize_500_objects", |b| {
        b.iter(|| black_box(ser::to_string(black_box(conversion.document()), &options)));
    });
}

fn benchmark_recovery(c: &mut Criterion) {
    let input = document(100, 8)
        .replace("</field>", "")
        .replace("<type>", "<fild>");
    c.bench_function("convert_malformed", |b| {
        b.iter(|| {
            let converter = Converter::bundled().unwrap();
            black_box(converter.convert_str(black_box(&input)))
        });
    });
}

criterion_group!(
    benches,
    benchmark_convert,
    benchmark_channel_capacity,
    benchmark_serialize,
    benchmark_recovery
);
criterion_main!(benches);
