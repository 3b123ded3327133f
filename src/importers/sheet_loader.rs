use calamine::{open_workbook, Data, Range, Reader, Xls, Xlsx};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::table::{CellValue, RawGrid};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode workbook: {0}")]
    Decode(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}

/// Workbook container, inferred from the file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Office Open XML workbook (.xlsx)
    Xlsx,
    /// Legacy BIFF workbook (.xls)
    Xls,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Ok(SheetFormat::Xlsx),
            "xls" => Ok(SheetFormat::Xls),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Which worksheet to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(idx) => write!(f, "#{idx}"),
            SheetSelector::Name(name) => f.write_str(name),
        }
    }
}

/// Load one worksheet as an untyped grid
///
/// `header_row = None` returns every row from sheet row 1 as data.
/// `Some(n)` skips the rows above `n` so the header ends up at row 0; the
/// caller still performs header promotion.
///
/// This is synchronous, async callers should use spawn_blocking.
pub fn load(
    path: impl AsRef<Path>,
    sheet: &SheetSelector,
    header_row: Option<usize>,
) -> Result<RawGrid, LoadError> {
    let path = path.as_ref();
    let format = SheetFormat::from_path(path)?;

    if !path.is_file() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let range = match format {
        SheetFormat::Xlsx => {
            let mut workbook: Xlsx<BufReader<File>> = match open_workbook(path) {
                Ok(wb) => wb,
                Err(e) => return Err(LoadError::Decode(e.to_string())),
            };
            read_range(&mut workbook, sheet)?
        }
        SheetFormat::Xls => {
            let mut workbook: Xls<BufReader<File>> = match open_workbook(path) {
                Ok(wb) => wb,
                Err(e) => return Err(LoadError::Decode(e.to_string())),
            };
            read_range(&mut workbook, sheet)?
        }
    };

    let skip = header_row.unwrap_or(0);
    Ok(RawGrid::new(anchor_at_a1(&range).into_iter().skip(skip).collect()))
}

/// Rows of `range` positioned as on the sheet
///
/// calamine ranges start at the first used cell. Blank leading rows and
/// columns are restored so index 0 is always row 1 / column A.
fn anchor_at_a1(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (top, left) = match range.start() {
        Some((row, col)) => (row as usize, col as usize),
        None => return Vec::new(),
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); top];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; left];
        cells.extend(row.iter().map(CellValue::from));
        rows.push(cells);
    }
    rows
}

fn read_range<R>(workbook: &mut R, sheet: &SheetSelector) -> Result<Range<Data>, LoadError>
where
    R: Reader<BufReader<File>>,
    R::Error: fmt::Display,
{
    let result = match sheet {
        SheetSelector::Index(idx) => workbook
            .worksheet_range_at(*idx)
            .ok_or_else(|| LoadError::SheetNotFound(sheet.to_string()))?,
        SheetSelector::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(LoadError::SheetNotFound(name.clone()));
            }
            workbook.worksheet_range(name)
        }
    };

    result.map_err(|e| LoadError::Decode(e.to_string()))
}
