//! Fixed catalog of jstat report modes and the columns extracted from each.
//!
//! The catalog is the single source of truth for both the sampler invocation
//! (which flag to pass) and the parser (which column feeds which metric).
//! Column indices are zero-based positions in the whitespace-split data line
//! and match the jstat layout shipped with JDK 8 and later.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace prefix of every exported metric.
pub const NAMESPACE: &str = "jstat";

/// A jstat report mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    #[value(name = "gccapacity")]
    GcCapacity,
    #[value(name = "gcold")]
    GcOld,
    #[value(name = "gcnew")]
    GcNew,
    #[value(name = "gcmetacapacity")]
    GcMetaCapacity,
    #[value(name = "gcutil")]
    GcUtil,
}

impl ReportMode {
    /// Command-line flag passed to the tool.
    pub fn flag(self) -> &'static str {
        match self {
            ReportMode::GcCapacity => "-gccapacity",
            ReportMode::GcOld => "-gcold",
            ReportMode::GcNew => "-gcnew",
            ReportMode::GcMetaCapacity => "-gcmetacapacity",
            ReportMode::GcUtil => "-gcutil",
        }
    }

    pub fn as_str(self) -> &'static str {
        &self.flag()[1..]
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One (column, metric) mapping of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub column: usize,
    /// Header label jstat prints above this column.
    pub header: &'static str,
    pub metric: &'static str,
    pub help: &'static str,
}

/// A report mode together with its ordered extractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSpec {
    pub mode: ReportMode,
    pub columns: &'static [Extraction],
}

impl ReportSpec {
    pub fn metric_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.metric)
    }
}

const fn col(
    column: usize,
    header: &'static str,
    metric: &'static str,
    help: &'static str,
) -> Extraction {
    Extraction {
        column,
        header,
        metric,
        help,
    }
}

/// All report modes in scrape order.
pub const CATALOG: &[ReportSpec] = &[
    ReportSpec {
        mode: ReportMode::GcCapacity,
        columns: &[
            col(1, "NGCMX", "newMax", "Maximum new generation capacity (kB)."),
            col(2, "NGC", "newCommit", "Current new generation capacity (kB)."),
            col(7, "OGCMX", "oldMax", "Maximum old generation capacity (kB)."),
            col(8, "OGC", "oldCommit", "Current old generation capacity (kB)."),
        ],
    },
    ReportSpec {
        mode: ReportMode::GcOld,
        columns: &[
            col(1, "MU", "metaUsed", "Metaspace utilization (kB)."),
            col(5, "OU", "oldUsed", "Old space utilization (kB)."),
        ],
    },
    ReportSpec {
        mode: ReportMode::GcNew,
        columns: &[
            col(2, "S0U", "sv0Used", "Survivor space 0 utilization (kB)."),
            col(3, "S1U", "sv1Used", "Survivor space 1 utilization (kB)."),
            col(8, "EU", "edenUsed", "Eden space utilization (kB)."),
        ],
    },
    ReportSpec {
        mode: ReportMode::GcMetaCapacity,
        columns: &[
            col(1, "MCMX", "metaMax", "Maximum metaspace capacity (kB)."),
            col(2, "MC", "metaCommit", "Metaspace capacity (kB)."),
        ],
    },
    ReportSpec {
        mode: ReportMode::GcUtil,
        columns: &[
            col(6, "YGC", "ygcTimes", "Number of young generation GC events."),
            col(7, "YGCT", "ygcSec", "Young generation garbage collection time (s)."),
            col(8, "FGC", "fgcTimes", "Number of full GC events."),
            col(9, "FGCT", "fgcSec", "Full garbage collection time (s)."),
        ],
    },
];

/// Looks up the catalog entry of a report mode.
pub fn spec_for(mode: ReportMode) -> &'static ReportSpec {
    CATALOG
        .iter()
        .find(|s| s.mode == mode)
        .unwrap_or_else(|| unreachable!("every report mode has a catalog entry"))
}

/// Catalog entries for the given modes, in catalog order and deduplicated.
pub fn select(modes: &[ReportMode]) -> Vec<ReportSpec> {
    CATALOG
        .iter()
        .filter(|s| modes.contains(&s.mode))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_mode_has_one_entry() {
        for mode in ReportMode::value_variants() {
            assert_eq!(
                CATALOG.iter().filter(|s| s.mode == *mode).count(),
                1,
                "mode {mode} must appear exactly once"
            );
            assert_eq!(spec_for(*mode).mode, *mode);
        }
    }

    #[test]
    fn test_metric_names_unique() {
        let mut seen = HashSet::new();
        for spec in CATALOG {
            for name in spec.metric_names() {
                assert!(seen.insert(name), "metric {name} declared twice");
            }
        }
    }

    #[test]
    fn test_documented_columns() {
        let cap = spec_for(ReportMode::GcCapacity);
        assert_eq!(cap.columns[0].column, 1);
        assert_eq!(cap.columns[0].metric, "newMax");
        assert_eq!(cap.columns[1].column, 2);
        assert_eq!(cap.columns[1].metric, "newCommit");

        let old = spec_for(ReportMode::GcOld);
        assert_eq!((old.columns[0].column, old.columns[0].metric), (1, "metaUsed"));
        assert_eq!((old.columns[1].column, old.columns[1].metric), (5, "oldUsed"));
    }

    #[test]
    fn test_select_keeps_catalog_order() {
        let selected = select(&[ReportMode::GcUtil, ReportMode::GcCapacity, ReportMode::GcUtil]);
        let modes: Vec<_> = selected.iter().map(|s| s.mode).collect();
        assert_eq!(modes, vec![ReportMode::GcCapacity, ReportMode::GcUtil]);
    }

    #[test]
    fn test_flag_and_name() {
        assert_eq!(ReportMode::GcMetaCapacity.flag(), "-gcmetacapacity");
        assert_eq!(ReportMode::GcOld.to_string(), "gcold");
    }
}
