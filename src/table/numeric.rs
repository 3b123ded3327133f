use super::grid::CellValue;
use super::header::LabeledTable;

/// Column-major numeric table keyed by label
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
    height: usize,
}

impl NumericTable {
    pub fn new(labels: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        let height = columns.first().map(Vec::len).unwrap_or(0);
        Self {
            labels,
            columns,
            height,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Values of the first column carrying `label`
    pub fn column(&self, label: &str) -> Option<&[f64]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|idx| self.columns.get(idx))
            .map(Vec::as_slice)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}

/// Parse one cell, anything that is not a finite number becomes 0
pub fn coerce_cell(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(f) if f.is_finite() => *f,
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Convert every cell of `table` to a number
///
/// Non-numeric and missing cells are replaced with exactly 0.0; no cell
/// is dropped, so every column has the table's row count.
pub fn coerce(table: &LabeledTable) -> NumericTable {
    let width = table.labels().len();
    let mut columns = vec![Vec::with_capacity(table.height()); width];

    for row in table.rows() {
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let value = row.get(col_idx).map(coerce_cell).unwrap_or(0.0);
            column.push(value);
        }
    }

    NumericTable {
        labels: table.labels().to_vec(),
        columns,
        height: table.height(),
    }
}
