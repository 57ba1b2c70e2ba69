//! Integration tests for the positional jstat output parser.
//!
//! These tests feed captured jstat output through the catalog entries and
//! verify extraction and the all-or-nothing failure behavior.

use jstat_exporter::catalog::spec_for;
use jstat_exporter::parser::parse;
use jstat_exporter::{MalformedReason, MetricRegistry, ReportMode};

/// `jstat -gccapacity` output as printed by JDK 8.
const GCCAPACITY_JDK8: &str = " NGCMN    NGCMX     NGC     S0C   S1C       EC      OGCMN      OGCMX       OGC         OC       MCMN     MCMX      MC     CCSMN    CCSMX     CCSC    YGC    FGC \n\
  1024.0  19648.0   5632.0  512.0  512.0   4608.0    44032.0    44032.0    44032.0    44032.0      0.0 1069056.0  21248.0      0.0 1048576.0   2560.0     12     0\n";

/// Truncated `-gccapacity` layout used in the exporter's documentation.
const GCCAPACITY_SHORT: &str = "NGCMN NGCMX NGC S0C S1C EC OGCMN OGCMX OGC\n\
1024.0 19648.0 5632.0 512.0 512.0 4608.0 44032.0 44032.0 44032.0\n";

const GCOLD: &str = "   MC       MU      CCSC     CCSU       OC          OU       YGC    FGC    FGCT     GCT   \n\
 21248.0  20619.3   2560.0   2384.6    44032.0     26155.7     12     0    0.000    0.093\n";

const GCNEW_JDK11: &str = " S0C    S1C    S0U    S1U   TT MTT  DSS      EC       EU     YGC     YGCT  \n\
 1024.0 1024.0    0.0  512.5 15  15  512.0   8192.0   4710.4      3    0.012\n";

const GCUTIL_JDK17: &str = "  S0     S1     E      O      M     CCS    YGC     YGCT     FGC    FGCT     CGC    CGCT       GCT   \n\
  0.00 100.00  28.57  12.31  97.41  91.06      4     0.021     1     0.034     2     0.003     0.058\n";

fn value_of(fields: &[jstat_exporter::parser::Field], metric: &str) -> f64 {
    fields
        .iter()
        .find(|f| f.metric == metric)
        .unwrap_or_else(|| panic!("metric {metric} missing"))
        .value
}

#[test]
fn test_gccapacity_new_generation_columns() {
    let spec = spec_for(ReportMode::GcCapacity);
    for raw in [GCCAPACITY_JDK8, GCCAPACITY_SHORT] {
        let fields = parse(raw, spec).expect("gccapacity parses");
        assert_eq!(value_of(&fields, "newMax"), 19648.0);
        assert_eq!(value_of(&fields, "newCommit"), 5632.0);
        assert_eq!(value_of(&fields, "oldMax"), 44032.0);
        assert_eq!(value_of(&fields, "oldCommit"), 44032.0);
    }
}

#[test]
fn test_extraction_yields_exactly_declared_metrics() {
    let spec = spec_for(ReportMode::GcCapacity);
    let fields = parse(GCCAPACITY_JDK8, spec).unwrap();
    let names: Vec<&str> = fields.iter().map(|f| f.metric).collect();
    let declared: Vec<&str> = spec.metric_names().collect();
    assert_eq!(names, declared);
}

#[test]
fn test_gcold_metaspace_and_old_usage() {
    let fields = parse(GCOLD, spec_for(ReportMode::GcOld)).unwrap();
    assert_eq!(value_of(&fields, "metaUsed"), 20619.3);
    assert_eq!(value_of(&fields, "oldUsed"), 26155.7);
}

#[test]
fn test_gcnew_survivor_and_eden() {
    let fields = parse(GCNEW_JDK11, spec_for(ReportMode::GcNew)).unwrap();
    assert_eq!(value_of(&fields, "sv0Used"), 0.0);
    assert_eq!(value_of(&fields, "sv1Used"), 512.5);
    assert_eq!(value_of(&fields, "edenUsed"), 4710.4);
}

#[test]
fn test_gcutil_counts_with_concurrent_gc_columns() {
    let fields = parse(GCUTIL_JDK17, spec_for(ReportMode::GcUtil)).unwrap();
    assert_eq!(value_of(&fields, "ygcTimes"), 4.0);
    assert_eq!(value_of(&fields, "ygcSec"), 0.021);
    assert_eq!(value_of(&fields, "fgcTimes"), 1.0);
    assert_eq!(value_of(&fields, "fgcSec"), 0.034);
}

#[test]
fn test_only_first_data_line_is_used() {
    let raw = format!("{GCOLD}21248.0 1.0 2560.0 2384.6 44032.0 2.0 12 0 0.000 0.093\n");
    let fields = parse(&raw, spec_for(ReportMode::GcOld)).unwrap();
    assert_eq!(value_of(&fields, "metaUsed"), 20619.3);
    assert_eq!(value_of(&fields, "oldUsed"), 26155.7);
}

#[test]
fn test_header_only_is_too_few_lines() {
    let err = parse("  MC MU CCSC CCSU OC OU\n", spec_for(ReportMode::GcOld)).unwrap_err();
    assert_eq!(err.mode, ReportMode::GcOld);
    assert_eq!(err.reason, MalformedReason::TooFewLines { lines: 1 });
}

#[test]
fn test_short_line_rejects_whole_report() {
    // oldUsed (column 5) is missing; metaUsed must not be returned either.
    let raw = "MC MU CCSC CCSU OC\n21248.0 20619.3 2560.0 2384.6 44032.0\n";
    let err = parse(raw, spec_for(ReportMode::GcOld)).unwrap_err();
    assert_eq!(
        err.reason,
        MalformedReason::ColumnOutOfRange {
            column: 5,
            fields: 5
        }
    );
    assert_eq!(err.line, "21248.0 20619.3 2560.0 2384.6 44032.0");
}

#[test]
fn test_non_numeric_field() {
    let raw = "MC MU CCSC CCSU OC OU\n21248.0 20619.3 - - 44032.0 26155.7\n";
    // CCSC/CCSU are not extracted, so dashes there are fine.
    assert!(parse(raw, spec_for(ReportMode::GcOld)).is_ok());

    let raw = "MC MU CCSC CCSU OC OU\n21248.0 n/a 2560.0 2384.6 44032.0 26155.7\n";
    let err = parse(raw, spec_for(ReportMode::GcOld)).unwrap_err();
    assert_eq!(
        err.reason,
        MalformedReason::NotANumber {
            column: 1,
            field: "n/a".into()
        }
    );
}

#[test]
fn test_non_finite_field() {
    for bad in ["NaN", "inf", "-infinity"] {
        let raw = format!("MC MU CCSC CCSU OC OU\n21248.0 {bad} 2560.0 2384.6 44032.0 26155.7\n");
        let err = parse(&raw, spec_for(ReportMode::GcOld)).unwrap_err();
        assert_eq!(
            err.reason,
            MalformedReason::NotANumber {
                column: 1,
                field: bad.into()
            }
        );
    }
}

#[test]
fn test_target_not_found_output_is_malformed() {
    let err = parse("12345 not found\n", spec_for(ReportMode::GcOld)).unwrap_err();
    assert_eq!(err.reason, MalformedReason::TooFewLines { lines: 1 });
    assert!(err.line.contains("not found"));
}

#[test]
fn test_failed_parse_leaves_registry_untouched() {
    let registry = MetricRegistry::new();
    let spec = spec_for(ReportMode::GcOld);
    for c in spec.columns {
        registry.declare(c.metric, c.help).unwrap();
    }
    let before = registry.snapshot();

    let result = parse("MC MU\n1.0 oops\n", spec);
    assert!(result.is_err());
    assert_eq!(registry.snapshot(), before);
}
