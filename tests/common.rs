#![allow(dead_code)]

use power_quality_service::analyzer::{AnalyzerProfile, PhaseColumns, Vendor};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// Write a single-sheet workbook to `dir/file_name`
///
/// Cells that parse as numbers are written as numbers, empty strings are
/// left blank, everything else is written as text.
pub fn write_workbook(dir: &Path, file_name: &str, rows: &[Vec<String>]) -> PathBuf {
    write_workbook_sheets(dir, file_name, &[("Sheet1", rows)])
}

pub fn write_workbook_sheets(
    dir: &Path,
    file_name: &str,
    sheets: &[(&str, &[Vec<String>])],
) -> PathBuf {
    let mut workbook = Workbook::new();

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).expect("Failed to name worksheet");

        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (r, c) = (row_idx as u32, col_idx as u16);
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(value) => worksheet.write_number(r, c, value),
                    Err(_) => worksheet.write_string(r, c, cell),
                }
                .expect("Failed to write cell");
            }
        }
    }

    let path = dir.join(file_name);
    workbook.save(&path).expect("Failed to save workbook");
    path
}

/// Write bytes that no spreadsheet engine can decode
pub fn write_corrupt(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, b"this is not a workbook").expect("Failed to write corrupt file");
    path
}

/// Lay out rows from a header and per-column values
pub fn rows_from_columns(header: &[&str], columns: &[Vec<&str>]) -> Vec<Vec<String>> {
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    let mut rows = vec![header.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    for row_idx in 0..height {
        rows.push(
            columns
                .iter()
                .map(|col| col.get(row_idx).copied().unwrap_or("").to_string())
                .collect(),
        );
    }
    rows
}

fn repeat(value: &'static str, n: usize) -> Vec<&'static str> {
    vec![value; n]
}

fn with_head(head: &[&'static str], fill: &'static str, n: usize) -> Vec<&'static str> {
    let mut values = head.to_vec();
    values.resize(n, fill);
    values
}

/// SONEL three-phase export, 10 readings
///
/// Expected: voltage A 40 %, voltage C 10 %, flicker A 20 %, flicker C 10 %,
/// THD A 20 %, imbalance 10 %, everything else 0 %.
pub fn sonel_rows() -> Vec<Vec<String>> {
    let header = [
        "Date",
        "Time",
        "U L1 avg. 10 min [V]",
        "U L2 avg. 10 min [V]",
        "U L3 avg. 10 min [V]",
        "Pst L1 [-]",
        "Pst L2 [-]",
        "Pst L3 [-]",
        "THD U L1 [%]",
        "THD U L2 [%]",
        "THD U L3 [%]",
        "U2/U1 [%]",
    ];
    let columns = vec![
        repeat("2024-05-01", 10),
        vec![
            "00:10", "00:20", "00:30", "00:40", "00:50", "01:00", "01:10", "01:20", "01:30",
            "01:40",
        ],
        vec![
            "130.0", "131.0", "135.0", "100.0", "120.0", "121.0", "119.0", "118.0", "125.0",
            "122.0",
        ],
        repeat("120.0", 10),
        with_head(&["109.0"], "120.0", 10),
        with_head(&["0.5", "1.5", "2.0", "0.9"], "0.5", 10),
        repeat("0.5", 10),
        with_head(&["1.1"], "0.3", 10),
        with_head(&["8.5", "9.0"], "2.0", 10),
        with_head(&["2.0", "2.0", "2.0", "2.0", "---"], "2.0", 10),
        repeat("1.5", 10),
        with_head(&["2.5"], "1.0", 10),
    ];
    rows_from_columns(&header, &columns)
}

/// AEMC single-phase export: title row, labels, units row, 4 readings
///
/// Expected: voltage A 50 %, flicker A 50 %, THD A 25 %, phase B 0 %.
pub fn aemc_rows() -> Vec<Vec<String>> {
    let mut rows = vec![vec!["PEL 103 export".to_string()]];
    rows.extend(rows_from_columns(
        &[
            "Date",
            "Time",
            "V1 (V)",
            "V2 (V)",
            "Pst1 (-)",
            "Pst2 (-)",
            "Vthd1 (%)",
            "Vthd2 (%)",
        ],
        &[
            vec!["", "2024-05-01", "2024-05-01", "2024-05-01", "2024-05-01"],
            vec!["", "00:10", "00:20", "00:30", "00:40"],
            vec!["V", "120", "140", "105", "121"],
            vec!["V", "120", "120", "120", "120"],
            vec!["-", "0.5", "1.5", "2.0", "0.9"],
            vec!["-", "0.2", "0.2", "0.2", "0.2"],
            vec!["%", "9", "1", "1", "1"],
            vec!["%", "1", "1", "1", "1"],
        ],
    ));
    rows
}

/// METREL three-phase export: labels, units row, 5 readings
///
/// Expected: voltage A 20 %, imbalance 40 %, everything else 0 %.
pub fn metrel_rows() -> Vec<Vec<String>> {
    rows_from_columns(
        &[
            "U1 Rms [V]",
            "U2 Rms [V]",
            "U3 Rms [V]",
            "Pst1 [-]",
            "Pst2 [-]",
            "Pst3 [-]",
            "Uthd1 [%]",
            "Uthd2 [%]",
            "Uthd3 [%]",
            "u- [%]",
        ],
        &[
            vec!["V", "100", "120", "120", "120", "120"],
            vec!["V", "120", "120", "120", "120", "120"],
            vec!["V", "120", "120", "120", "120", "120"],
            vec!["", "0.4", "0.4", "0.4", "0.4", "0.4"],
            vec!["", "0.4", "0.4", "0.4", "0.4", "0.4"],
            vec!["", "0.4", "0.4", "0.4", "0.4", "0.4"],
            vec!["%", "3", "3", "3", "3", "3"],
            vec!["%", "3", "3", "3", "3", "3"],
            vec!["%", "3", "3", "3", "3", "3"],
            vec!["%", "3", "3", "0", "0", "0"],
        ],
    )
}

pub fn sonel_profile() -> AnalyzerProfile {
    AnalyzerProfile {
        name: "PQM-702".to_string(),
        vendor: Vendor::Sonel,
        voltage: PhaseColumns::new("U L1 avg", "U L2 avg", Some("U L3 avg")),
        flicker: PhaseColumns::new("Pst L1", "Pst L2", Some("Pst L3")),
        thd: PhaseColumns::new("THD U L1", "THD U L2", Some("THD U L3")),
        imbalance: Some("U2/U1".to_string()),
    }
}

pub fn aemc_profile() -> AnalyzerProfile {
    AnalyzerProfile {
        name: "PEL 103".to_string(),
        vendor: Vendor::Aemc,
        voltage: PhaseColumns::new("V1", "V2", None),
        flicker: PhaseColumns::new("Pst1", "Pst2", None),
        thd: PhaseColumns::new("Vthd1", "Vthd2", None),
        imbalance: None,
    }
}

pub fn metrel_profile() -> AnalyzerProfile {
    AnalyzerProfile {
        name: "MI 2892".to_string(),
        vendor: Vendor::Metrel,
        voltage: PhaseColumns::new("U1 Rms", "U2 Rms", Some("U3 Rms")),
        flicker: PhaseColumns::new("Pst1", "Pst2", Some("Pst3")),
        thd: PhaseColumns::new("Uthd1", "Uthd2", Some("Uthd3")),
        imbalance: Some("u-".to_string()),
    }
}
