use clap::Parser;
use std::path::PathBuf;

use power_quality_service::analyzer::Vendor;
use power_quality_service::importers::{load, SheetSelector};
use power_quality_service::table::CellValue;

/// Show how an analyzer export is laid out, to help fill in profiles
#[derive(Parser)]
#[command(name = "inspect-sheet")]
struct Cli {
    /// Spreadsheet export (.xlsx or .xls)
    file: PathBuf,

    /// Also show labels as normalized for this analyzer format
    #[arg(long)]
    vendor: Option<String>,

    /// Worksheet name, defaults to the first sheet
    #[arg(long)]
    sheet: Option<String>,

    /// Number of rows to print
    #[arg(long, default_value = "15")]
    rows: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let sheet = cli
        .sheet
        .map(SheetSelector::Name)
        .unwrap_or_default();

    println!("Opening export: {}", cli.file.display());
    let grid = load(&cli.file, &sheet, None)?;

    println!("Sheet {sheet}: {} rows x {} columns", grid.height(), grid.width());
    println!("{}", "=".repeat(100));

    for (row_idx, row) in grid.rows().enumerate().take(cli.rows) {
        // Only print rows with data
        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        print!("Row {:3}: ", row_idx);
        for cell in row.iter().take(10) {
            match cell {
                CellValue::Empty => print!("[empty] "),
                other => print!("[{}] ", other.as_label()),
            }
        }
        println!();
    }

    if let Some(tag) = cli.vendor {
        let vendor: Vendor = tag.parse()?;
        let table = vendor.plan().normalize(&grid)?;

        println!("\n{}", "=".repeat(100));
        println!("Normalized {vendor} labels ({} data rows):", table.height());
        println!("{}", "=".repeat(100));
        for (col_idx, label) in table.labels().iter().enumerate() {
            println!("Col {col_idx:3}: {label}");
        }
    }

    Ok(())
}
