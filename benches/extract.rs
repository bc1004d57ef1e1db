use cc_array_extract::extractor::{ExtractMode, ScanPolicy, extract_text};
use cc_array_extract::pack::PackFormat;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

/// Render `len` bytes the way `xxd -i` lays out a model array.
fn make_hex_source(len: usize) -> String {
    let mut out = String::from("const unsigned char g_model[] = {\n");
    for row in (0..len).collect::<Vec<_>>().chunks(12) {
        let line = row
            .iter()
            .map(|i| format!("0x{:02x}", i % 256))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str("  ");
        out.push_str(&line);
        out.push_str(",\n");
    }
    out.push_str("};\n");
    out
}

fn make_sample_source(len: usize) -> String {
    (0..len)
        .map(|i| ((i as i64 * 37) % 65536 - 32768).to_string())
        .collect::<Vec<_>>()
        .chunks(16)
        .map(|row| row.join(", ") + ",\n")
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let model = make_hex_source(300_000);
    let samples = make_sample_source(16_000);

    c.bench_function("hex model 300KB", |bch| {
        bch.iter(|| {
            extract_text(
                black_box(&model),
                ExtractMode::Hex,
                PackFormat::UNSIGNED_BYTE,
                ScanPolicy::Lenient,
            )
        })
    });

    c.bench_function("decimal <h 16k samples", |bch| {
        bch.iter(|| {
            extract_text(
                black_box(&samples),
                ExtractMode::Decimal,
                PackFormat::LITTLE_ENDIAN_I16,
                ScanPolicy::Lenient,
            )
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
