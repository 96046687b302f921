//! CSV export of hourly dispatch results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::runner::SimulationReport;

/// Column header for the hourly CSV export.
const HEADER: &str = "timestep,time_utc,pv_available_kw,load_kw,pv_used_kw,\
                       gen_output_kw,diesel_liters,dispatch_case";

/// Exports hourly results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(report: &SimulationReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(report, buf)
}

/// Writes hourly results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(report: &SimulationReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for (t, hour) in report.result.iter().enumerate() {
        let time = report
            .timestamps
            .get(t)
            .map(|ts| ts.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .unwrap_or_default();
        let pv_available = report.pv_output_kw.get(t).copied().unwrap_or(0.0);
        wtr.write_record(&[
            t.to_string(),
            time,
            format!("{pv_available:.4}"),
            format!("{:.4}", hour.load_kw),
            format!("{:.4}", hour.pv_used_kw),
            format!("{:.4}", hour.gen_output_kw),
            format!("{:.4}", hour.diesel_liters),
            hour.case.as_str().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
