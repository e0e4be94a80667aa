//! Debug bundle writer for inspecting fetched inputs and pipeline output.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::domain::{ChartConfig, HistorySnapshot};
use crate::error::AppError;

pub fn write_debug_bundle(
    run: &RunOutput,
    history: &HistorySnapshot,
    config: &ChartConfig,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::runtime(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let country = config.country.replace(char::is_whitespace, "_");
    let path = dir.join(format!("epi_debug_{country}_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::runtime(format!("Failed to create debug file: {e}")))?;

    write_bundle(&mut file, run, history, config)
        .map_err(|e| AppError::runtime(format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn write_bundle(
    file: &mut File,
    run: &RunOutput,
    history: &HistorySnapshot,
    config: &ChartConfig,
) -> std::io::Result<()> {
    writeln!(file, "# epi debug bundle")?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(file, "- country: {}", config.country)?;
    writeln!(file, "- snapshot_tag: {}", history.country)?;
    writeln!(
        file,
        "- population: {}",
        run.population
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    )?;
    writeln!(
        file,
        "- range: {} .. {} | lastdays: {}",
        config.start_date, config.end_date, config.lastdays
    )?;
    writeln!(
        file,
        "- refs: case={} death={} recover={}",
        config.refs.case_ref, config.refs.death_ref, config.refs.recover_ref
    )?;
    writeln!(
        file,
        "- raw keys: cases={} deaths={} recovered={}",
        history.cases.len(),
        history.deaths.len(),
        history.recovered.len()
    )?;
    writeln!(
        file,
        "- aligned: {} | in range: {}",
        run.aligned_len,
        run.records.len()
    )?;

    writeln!(file, "\n## Skipped keys")?;
    if run.skipped.is_empty() {
        writeln!(file, "(none)")?;
    } else {
        writeln!(file, "| raw | reason |")?;
        writeln!(file, "| - | - |")?;
        for s in &run.skipped {
            writeln!(file, "| {} | {} |", s.raw, s.reason)?;
        }
    }

    writeln!(file, "\n## Metrics")?;
    writeln!(file, "| metric | total | pct |")?;
    writeln!(file, "| - | - | - |")?;
    writeln!(
        file,
        "| cases | {} | {} |",
        fmt_opt_u64(run.metrics.case_total),
        fmt_opt_pct(run.metrics.case_pct)
    )?;
    writeln!(
        file,
        "| deaths | {} | {} |",
        fmt_opt_u64(run.metrics.death_total),
        fmt_opt_pct(run.metrics.death_pct)
    )?;
    writeln!(
        file,
        "| recovered | {} | {} |",
        fmt_opt_u64(run.metrics.recover_total),
        fmt_opt_pct(run.metrics.recover_pct)
    )?;

    writeln!(file, "\n## Range totals")?;
    for t in &run.totals {
        writeln!(file, "- {}: {}", t.label, t.value)?;
    }

    writeln!(file, "\n## Record tail")?;
    writeln!(file, "| date | cases | deaths | recovered |")?;
    writeln!(file, "| - | - | - | - |")?;
    let tail = run.records.len().saturating_sub(15);
    for r in &run.records[tail..] {
        writeln!(
            file,
            "| {} | {} | {} | {} |",
            r.date,
            fmt_opt_u64(r.cases),
            fmt_opt_u64(r.deaths),
            fmt_opt_u64(r.recovered)
        )?;
    }

    Ok(())
}

fn fmt_opt_u64(v: Option<u64>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn fmt_opt_pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    }
}
