use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::table::header::promote_header;
use crate::table::window::select;
use crate::table::{HeaderError, LabelRules, LabeledTable, RawGrid, Span, Window};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported analyzer: {0}")]
pub struct UnsupportedAnalyzer(pub String);

/// Analyzer brand whose export format the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vendor {
    Sonel,
    Aemc,
    Metrel,
}

/// Fixed pipeline parameters for one vendor format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorPlan {
    /// Region of the raw sheet holding the header row and readings
    pub window: Window,
    /// Data rows to discard right after header promotion (unit rows)
    pub extra_header_rows: usize,
    pub label_rules: LabelRules,
}

impl VendorPlan {
    /// Harmonic-order table: a title row above the header, timestamps in
    /// column 0, then one column per harmonic order labeled with the order
    pub const HARMONIC_TABLE: VendorPlan = VendorPlan {
        window: Window::new(Span::starting_at(1), Span::starting_at(1)),
        extra_header_rows: 0,
        label_rules: LabelRules::Verbatim,
    };

    /// Window, promote, drop unit rows and rewrite labels in one step
    pub fn normalize(&self, grid: &RawGrid) -> Result<LabeledTable, HeaderError> {
        let windowed = select(grid, self.window);
        debug!(
            stage = "window",
            rows = windowed.height(),
            cols = windowed.width(),
            "Selected window"
        );

        let table = promote_header(windowed)?
            .drop_leading_rows(self.extra_header_rows)
            .normalize_labels(self.label_rules);
        debug!(
            stage = "header",
            rows = table.height(),
            labels = ?table.labels(),
            "Normalized header"
        );
        Ok(table)
    }
}

impl Vendor {
    pub const ALL: [Vendor; 3] = [Vendor::Sonel, Vendor::Aemc, Vendor::Metrel];

    /// Tags accepted at the boundary, uppercase and case-sensitive
    pub fn supported_tags() -> [&'static str; 3] {
        Self::ALL.map(Vendor::tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Vendor::Sonel => "SONEL",
            Vendor::Aemc => "AEMC",
            Vendor::Metrel => "METREL",
        }
    }

    pub fn plan(self) -> VendorPlan {
        match self {
            // Columns 0-1 hold date and time
            Vendor::Sonel => VendorPlan {
                window: Window::new(Span::ALL, Span::starting_at(2)),
                extra_header_rows: 0,
                label_rules: LabelRules::Sonel,
            },
            // Row 0 is a title row, the row under the labels carries units
            Vendor::Aemc => VendorPlan {
                window: Window::new(Span::starting_at(1), Span::starting_at(2)),
                extra_header_rows: 1,
                label_rules: LabelRules::Aemc,
            },
            Vendor::Metrel => VendorPlan {
                window: Window::ALL,
                extra_header_rows: 1,
                label_rules: LabelRules::Metrel,
            },
        }
    }
}

impl FromStr for Vendor {
    type Err = UnsupportedAnalyzer;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|vendor| vendor.tag() == tag)
            .ok_or_else(|| UnsupportedAnalyzer(tag.to_string()))
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
