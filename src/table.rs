// Tabular stages of the analysis pipeline
//
// A raw sheet flows through these modules in order:
// - grid: untyped cells as loaded from the workbook
// - window: rectangular sub-selection by vendor offsets
// - header: label promotion and vendor label rewriting
// - numeric: lossy conversion of every cell to f64

pub mod grid;
pub mod header;
pub mod numeric;
pub mod window;

pub use grid::{CellValue, RawGrid};
pub use header::{HeaderError, LabelRules, LabeledTable};
pub use numeric::NumericTable;
pub use window::{Span, Window};
