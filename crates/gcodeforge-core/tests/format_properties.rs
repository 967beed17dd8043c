use gcodeforge_core::{format_field, format_fixed, Axis, Program};
use proptest::prelude::*;

proptest! {
    #[test]
    fn always_six_decimals(value in -1.0e6f64..1.0e6) {
        let text = format_fixed(value);
        let (_, fraction) = text.split_once('.').unwrap();
        prop_assert_eq!(fraction.len(), 6);
        prop_assert!(!text.contains('e'));
    }

    #[test]
    fn within_half_a_unit(value in -1.0e4f64..1.0e4) {
        let parsed: f64 = format_fixed(value).parse().unwrap();
        prop_assert!((parsed - value).abs() <= 5.0e-7 + 1.0e-9);
    }

    #[test]
    fn negation_is_symmetric(value in 0.0f64..1.0e4) {
        let positive = format_fixed(value);
        let negative = format_fixed(-value);
        if positive == "0.000000" {
            prop_assert_eq!(negative, positive);
        } else {
            prop_assert_eq!(negative, format!("-{}", positive));
        }
    }

    #[test]
    fn program_text_round_trips(lines in prop::collection::vec("[A-Z0-9 .\\-]{0,12}", 0..20)) {
        let program = Program::new(lines);
        let text = program.to_text();
        let reparsed = Program::from_text(&text);
        // str::lines drops one trailing empty line
        if program.lines().last().is_some_and(|l| l.is_empty()) {
            prop_assert_eq!(reparsed.len() + 1, program.len());
        } else {
            prop_assert_eq!(reparsed, program);
        }
    }
}

#[test]
fn field_formatting_matches_axis() {
    for axis in Axis::ALL {
        let field = format_field(axis, 1.5);
        assert_eq!(field, format!("{}1.500000", axis.letter()));
    }
}

#[test]
fn program_serializes_as_lines() {
    let program = Program::from_text("M3\nX1 Y2");
    let json = serde_json::to_string(&program).unwrap();
    let back: Program = serde_json::from_str(&json).unwrap();
    assert_eq!(back, program);
}
