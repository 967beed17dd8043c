use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gcodeforge_core::ConversionMode;
use gcodeforge_engine::{convert, ConvertOptions, RawParameters};

fn pattern_program(points: usize) -> String {
    let mut lines = vec![
        "% bench".to_string(),
        "G1 F10000".to_string(),
        "M3".to_string(),
        "F10000".to_string(),
        "Z0".to_string(),
        "X0.000000 Y1.500000".to_string(),
        "F1500".to_string(),
    ];
    for i in 0..points {
        let angle = i as f64 / points as f64 * std::f64::consts::TAU;
        lines.push(format!(
            "Z4 X{:.6} Y{:.6}",
            5.4 * angle.cos(),
            1.5 * angle.sin()
        ));
    }
    lines.extend(["", "Z0", "X0", "", "M5", "M30"].map(String::from));
    lines.join("\n")
}

fn params(pairs: &[(&str, &str)]) -> RawParameters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn bench_convert(c: &mut Criterion) {
    let input = pattern_program(200);
    let options = ConvertOptions::default();

    let repeat = params(&[("repetitions", "40"), ("offset", "5.715")]);
    c.bench_function("pattern_repeat_40x200", |b| {
        b.iter(|| {
            convert(
                ConversionMode::PatternRepeat,
                black_box(&input),
                &repeat,
                &options,
            )
        })
    });

    let two_axis = params(&[("repetitions", "40"), ("offset", "8.16")]);
    c.bench_function("two_axis_40x200", |b| {
        b.iter(|| convert(ConversionMode::TwoAxis, black_box(&input), &two_axis, &options))
    });

    c.bench_function("axis_remap_200", |b| {
        b.iter(|| {
            convert(
                ConversionMode::AxisRemap,
                black_box(&input),
                &RawParameters::new(),
                &options,
            )
        })
    });
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
