use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::grid::{CellValue, RawGrid};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Selected window is empty, no header row to promote")]
    EmptyWindow,
}

/// Sheet with its header row promoted to column labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    labels: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl LabeledTable {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Drop `count` leading data rows (unit or sub-header rows some
    /// vendors place under the labels)
    pub fn drop_leading_rows(mut self, count: usize) -> Self {
        let count = count.min(self.rows.len());
        self.rows.drain(..count);
        self
    }

    /// Rewrite every label with the given vendor rule set
    pub fn normalize_labels(mut self, rules: LabelRules) -> Self {
        for label in &mut self.labels {
            *label = rules.apply(label);
        }
        self
    }
}

/// Promote row 0 of `grid` to labels and keep the remaining rows as data
///
/// Blank header cells are named `column_<index>` so every column stays
/// addressable.
pub fn promote_header(grid: RawGrid) -> Result<LabeledTable, HeaderError> {
    if grid.is_empty() {
        return Err(HeaderError::EmptyWindow);
    }

    let mut rows = grid.into_rows().into_iter();
    let header = rows.next().ok_or(HeaderError::EmptyWindow)?;

    let labels = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            if cell.is_empty() {
                format!("column_{idx}")
            } else {
                cell.as_label()
            }
        })
        .collect();

    Ok(LabeledTable {
        labels,
        rows: rows.collect(),
    })
}

// SONEL: "Voltage instant. 10 min [V]" -> "Voltage inst"
static SONEL_INTERVAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s*\d+\s*min").expect("valid interval regex"));
static SONEL_INSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binstant\b").expect("valid instant regex"));
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid bracket regex"));
// AEMC: "Flicker (Pst)" -> "Flicker"
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthesis regex"));

/// Vendor-specific label rewrite rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRules {
    Sonel,
    Aemc,
    Metrel,
    /// Keep labels as written (harmonic-order tables)
    Verbatim,
}

impl LabelRules {
    pub fn apply(self, label: &str) -> String {
        let rewritten = match self {
            LabelRules::Sonel => {
                let label = SONEL_INTERVAL_SUFFIX.replace_all(label, "");
                let label = SONEL_INSTANT.replace_all(&label, "inst");
                BRACKETED.replace_all(&label, "").into_owned()
            }
            LabelRules::Aemc => PARENTHESIZED.replace_all(label, "").into_owned(),
            LabelRules::Metrel => BRACKETED.replace_all(label, "").into_owned(),
            LabelRules::Verbatim => label.to_string(),
        };
        rewritten.trim().to_string()
    }
}
