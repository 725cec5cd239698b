//! Plain renderings of a session report: aligned text table, JSON and CSV.

use anyhow::{Context, Result};
use seqbench_core::report::ReportEntry;
use seqbench_core::{Registry, Report};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const CSV_HEADER: &str = concat!(
    "kind,operation,order,status,samples,",
    "mean_ns,std_dev_ns,population_std_dev_ns,min_ns,max_ns,median_ns,p95_ns,p99_ns,",
    "truncated,observed,failure"
);

const TABLE_HEADER: [&str; 8] = ["kind", "operation", "order", "samples", "mean", "std dev", "min", "status"];

/// Human scale for a nanosecond value.
pub fn format_ns(ns: f64) -> String {
    if ns >= 1_000_000_000.0 {
        format!("{:.3} s", ns / 1_000_000_000.0)
    } else if ns >= 1_000_000.0 {
        format!("{:.3} ms", ns / 1_000_000.0)
    } else if ns >= 1_000.0 {
        format!("{:.3} us", ns / 1_000.0)
    } else {
        format!("{:.0} ns", ns)
    }
}

fn table_row(entry: &ReportEntry) -> [String; 8] {
    let (samples, mean, std_dev, min) = match &entry.cell {
        Some(cell) => (
            cell.samples.to_string(),
            format_ns(cell.mean_ns),
            format_ns(cell.std_dev_ns),
            format_ns(cell.min_ns),
        ),
        None => ("-".to_string(), "no data".to_string(), "-".to_string(), "-".to_string()),
    };
    let status = match &entry.failure {
        Some(failure) => format!("{}: {}", entry.status().label(), failure),
        None if entry.cell.as_ref().is_some_and(|cell| cell.truncated) => "partial: time limit".to_string(),
        None => entry.status().label().to_string(),
    };
    [
        entry.kind.to_string(),
        entry.operation.clone(),
        entry.order.to_string(),
        samples,
        mean,
        std_dev,
        min,
        status,
    ]
}

pub fn render_table(report: &Report) -> String {
    let rows: Vec<[String; 8]> = report.entries().iter().map(table_row).collect();
    let mut widths = TABLE_HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header = TABLE_HEADER.map(str::to_string);
    for row in std::iter::once(&header).chain(rows.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    let failures = report.failures().count();
    let _ = writeln!(
        out,
        "\n{} scenario(s), {} with failures, fixture size {}",
        report.len(),
        failures,
        report.config.fixture_size
    );
    out
}

pub fn render_list(registry: &Registry) -> String {
    let mut out = String::new();
    for workload in registry {
        let _ = writeln!(
            out,
            "{:<28} {:<10} {:<28} expected={}",
            workload.label(),
            workload.order(),
            workload.pipeline().unwrap_or("-"),
            workload
                .expected()
                .map_or_else(|| "-".to_string(), |value| value.to_string())
        );
    }
    out
}

pub fn write_json(path: &Path, report: &Report) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).with_context(|| format!("write {}", path.display()))
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

pub fn write_csv(path: &Path, report: &Report) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path).with_context(|| format!("create {}", path.display()))?);
    writeln!(writer, "{}", CSV_HEADER)?;
    for entry in report.entries() {
        let stats = match &entry.cell {
            Some(cell) => format!(
                "{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{}",
                cell.samples,
                cell.mean_ns,
                cell.std_dev_ns,
                cell.population_std_dev_ns,
                cell.min_ns,
                cell.max_ns,
                cell.median_ns,
                cell.p95_ns,
                cell.p99_ns,
                cell.truncated
            ),
            None => ",,,,,,,,,".to_string(),
        };
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            entry.kind,
            csv_field(&entry.operation),
            entry.order,
            entry.status().label(),
            stats,
            entry.observed.map(|value| value.to_string()).unwrap_or_default(),
            csv_field(&entry.failure.as_ref().map(|failure| failure.to_string()).unwrap_or_default())
        )?;
    }
    writer.flush()?;
    Ok(())
}
