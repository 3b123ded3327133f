// ! Spreadsheet importers for analyzer exports

pub mod sheet_loader;

// Re-export commonly used items
pub use sheet_loader::{load, LoadError, SheetFormat, SheetSelector};
