use gcodeforge_core::{ConversionError, ConversionMode, ParameterError, StructuralError};
use gcodeforge_engine::{convert, ConvertOptions, RawParameters};

fn raw(pairs: &[(&str, &str)]) -> RawParameters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

const TWO_AXIS_INPUT: &str = "% 0 Holes

G1 F10000
M3

F10000
Z0
X0.000000 Y2.000000
F1500

Z4 X0.000000 Y2.000000
Z4 X0.103710 Y1.997356

Z0
X0

M5
M30";

const PATTERN_INPUT: &str = "% pattern

G1 F10000
M3
F10000
Z0
X0.000000 Y1.500000
F1500
Z4 X0.000000 Y1.500000
Z4 X-5.400000 Y1.500000

Z0
X0

M5
M30";

#[test]
fn test_axis_remap() {
    let input = "% 14 Holes\nG1 F10000\nM3\nZ0\nZ4.000000\nX13.738900 Y0.016700\nZ4.000000\nZ0\nX0\nM5\nM30";
    let output = convert(
        ConversionMode::AxisRemap,
        input,
        &raw(&[]),
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(
        output.text(),
        "% 14 Holes\nG1 F10000\nM3\nZ4.000000\nX0 Y13.738900\nZ4.016700\nX0\nM5\nM30"
    );
}

#[test]
fn test_axis_remap_zeroes_x_in_comments() {
    let output = convert(
        ConversionMode::AxisRemap,
        "% jig X12.5 Y3\nM3\nZ4",
        &raw(&[]),
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(output.text(), "% jig X0 Y3\nM3\nZ4.000000");
}

#[test]
fn test_axis_remap_rejects_parameters() {
    let err = convert(
        ConversionMode::AxisRemap,
        "X1 Y1",
        &raw(&[("offset", "1")]),
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConversionError::Parameter(ParameterError::Unrecognized { .. })
    ));
}

#[test]
fn test_two_axis() {
    let params = raw(&[
        ("repetitions", "2"),
        ("offset", "8.16"),
        ("rapid_feedrate", "8000"),
        ("engraving_feedrate", "900"),
    ]);
    let output = convert(
        ConversionMode::TwoAxis,
        TWO_AXIS_INPUT,
        &params,
        &ConvertOptions::default(),
    )
    .unwrap();

    let expected = "% 0 Holes

G1 F10000
M3

F8000
Z0
X0.000000 Y2.000000 B0.000000
F900
Z4 X0.000000 Y2.000000 B0.000000
Z4 X0.103710 Y1.997356 B0.000000

F8000
Z0
X0.000000 Y2.000000 B8.160000
F900
Z4 X0.000000 Y2.000000 B8.160000
Z4 X0.103710 Y1.997356 B8.160000

Z0
X0

M5
M30";
    assert_eq!(output.text(), expected);
}

#[test]
fn test_two_axis_default_feedrates() {
    let output = convert(
        ConversionMode::TwoAxis,
        TWO_AXIS_INPUT,
        &raw(&[("repetitions", "1"), ("offset", "8.16")]),
        &ConvertOptions::default(),
    )
    .unwrap();
    let lines = output.program().lines();
    assert!(lines.contains(&"F10000".to_string()));
    assert!(lines.contains(&"F1500".to_string()));
    assert_eq!(lines.iter().filter(|l| l.ends_with("B0.000000")).count(), 3);
}

#[test]
fn test_two_axis_missing_marker() {
    let err = convert(
        ConversionMode::TwoAxis,
        "G1 F10000\nZ4 X1 Y1\nM5",
        &raw(&[("repetitions", "2"), ("offset", "8.16")]),
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not find header end marker (M3). The header should end with M3 on its own line."
    );
}

#[test]
fn test_two_axis_empty_pattern() {
    let err = convert(
        ConversionMode::TwoAxis,
        "G1 F10000\nM3\n\nZ0\nX0\nM5\nM30",
        &raw(&[("repetitions", "2"), ("offset", "8.16")]),
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, ConversionError::Structural(StructuralError::EmptyPattern));
}

#[test]
fn test_pattern_repeat() {
    let output = convert(
        ConversionMode::PatternRepeat,
        PATTERN_INPUT,
        &raw(&[("repetitions", "2"), ("offset", "5.715")]),
        &ConvertOptions::default(),
    )
    .unwrap();
    let lines = output.program().lines();

    assert_eq!(lines[0], "; --- Transformed G-code Description ---");
    assert_eq!(lines[7], "; ---------------------------------------");
    assert_eq!(lines[8], "");
    assert_eq!(
        &lines[9..17],
        &[
            "% pattern",
            "G1 F10000",
            "M3",
            "F10000",
            "Z0",
            "X0.000000 Y1.500000",
            "F1500",
            ""
        ]
    );
    assert_eq!(
        &lines[17..25],
        &[
            "; --- Repetition 1 (Y-offset: 0.000000) ---",
            "F10000",
            "Z-4",
            "X-6.000000 Y6.000000",
            "F1500",
            "Z1.500000 X0.000000 Y0.000000",
            "Z1.500000 X5.400000 Y-5.400000",
            "Z-4"
        ]
    );
    assert_eq!(lines[25], "");
    assert_eq!(
        &lines[26..34],
        &[
            "; --- Repetition 2 (Y-offset: 5.715000) ---",
            "F10000",
            "Z-4",
            "X-6.000000 Y11.715000",
            "F1500",
            "Z1.500000 X0.000000 Y5.715000",
            "Z1.500000 X5.400000 Y0.315000",
            "Z-4"
        ]
    );
    assert_eq!(&lines[34..], &["", "X0", "M5", "M30"]);
}

#[test]
fn test_pattern_repeat_timestamp_is_optional() {
    let options = ConvertOptions {
        generated_at: Some(chrono::Local::now()),
        ..ConvertOptions::default()
    };
    let params = raw(&[("repetitions", "1"), ("offset", "5.715")]);

    let stamped = convert(ConversionMode::PatternRepeat, PATTERN_INPUT, &params, &options).unwrap();
    assert!(stamped.program().lines()[1].starts_with("; Generated on: "));

    let plain = convert(
        ConversionMode::PatternRepeat,
        PATTERN_INPUT,
        &params,
        &ConvertOptions::default(),
    )
    .unwrap();
    assert_eq!(plain.line_count() + 1, stamped.line_count());
}

#[test]
fn test_mirror_repeat() {
    let output = convert(
        ConversionMode::MirrorRepeat,
        "G1 F10000\nM3\nX1.5 Y2\nX-2 Y3\nM5\nM30",
        &raw(&[("repetitions", "2"), ("offset", "10")]),
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(
        output.text(),
        "G1 F10000\nM3\n\nG90\nG0 X0.000000\nX-1.500000 Y2\nX2.000000 Y3\nZ4\n\nG0 X10.000000\nX8.500000 Y2\nX12.000000 Y3\nZ4\n\nM5\nM30"
    );
}

#[test]
fn test_mirror_repeat_on_y() {
    let output = convert(
        ConversionMode::MirrorRepeat,
        "M3\nX1 Y2\nM30",
        &raw(&[("repetitions", "1"), ("offset", "10"), ("mirror_axis", "Y")]),
        &ConvertOptions::default(),
    )
    .unwrap();
    assert_eq!(
        output.text(),
        "M3\n\nG90\nG0 X0.000000\nX1.000000 Y-2.000000\nZ4\n\nM30"
    );
}

#[test]
fn test_zero_repetitions_yields_parameter_error() {
    for mode in [
        ConversionMode::PatternRepeat,
        ConversionMode::TwoAxis,
        ConversionMode::MirrorRepeat,
    ] {
        let err = convert(
            mode,
            TWO_AXIS_INPUT,
            &raw(&[("repetitions", "0"), ("offset", "5")]),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "parameter");

        let err = convert(
            mode,
            TWO_AXIS_INPUT,
            &raw(&[("repetitions", "2"), ("offset", "five")]),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "parameter");
    }
}

#[test]
fn test_conversion_is_deterministic() {
    let params = raw(&[("repetitions", "3"), ("offset", "8.16")]);
    let first = convert(
        ConversionMode::TwoAxis,
        TWO_AXIS_INPUT,
        &params,
        &ConvertOptions::default(),
    );
    let second = convert(
        ConversionMode::TwoAxis,
        TWO_AXIS_INPUT,
        &params,
        &ConvertOptions::default(),
    );
    assert_eq!(first, second);
}
