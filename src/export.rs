//! CSV export of series tables and cycle events, plus an SVG chart.
//!
//! Dates are written as `YYYY-MM-DD`, undefined smoothed values as an empty
//! field. Output depends only on the input, so identical runs produce
//! byte-identical files.

use crate::core::Series;
use crate::cycle::CycleEvent;
use crate::error::Result;
use crate::pipeline::PipelineResult;
use crate::transform::SmoothedSeries;
use chrono::NaiveDate;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

mod chart;

pub use chart::{draw_chart, render_chart, write_chart, CHART_SIZE};

pub const FULL_SERIES_FILE: &str = "full_series.csv";
pub const FILTERED_SERIES_FILE: &str = "filtered_series.csv";
pub const CYCLE_EVENTS_FILE: &str = "cycle_events.csv";
pub const CYCLE_CHART_FILE: &str = "cycle_chart.svg";

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Write `Date,Value` for every observation.
pub fn write_full_table<W: Write>(writer: W, series: &Series) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Value"])?;
    for obs in series {
        wtr.write_record([format_date(obs.date()), obs.value().to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `Date,Value,SmoothedValue` for every retained observation.
pub fn write_filtered_table<W: Write>(writer: W, smoothed: &SmoothedSeries) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Value", "SmoothedValue"])?;
    for (date, value, smoothed) in smoothed.rows() {
        wtr.write_record([
            format_date(date),
            value.to_string(),
            smoothed.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `Date,Label` for every cycle event.
pub fn write_events<W: Write>(writer: W, events: &[CycleEvent]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Label"])?;
    for event in events {
        wtr.write_record([format_date(event.date), event.label.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Paths written by [`export_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub full_series: PathBuf,
    pub filtered_series: PathBuf,
    pub cycle_events: PathBuf,
    pub cycle_chart: PathBuf,
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the three tables and the chart of a pipeline run into `dir`, creating it if needed.
pub fn export_report(dir: &Path, result: &PipelineResult) -> Result<ReportPaths> {
    fs::create_dir_all(dir)?;

    let paths = ReportPaths {
        full_series: dir.join(FULL_SERIES_FILE),
        filtered_series: dir.join(FILTERED_SERIES_FILE),
        cycle_events: dir.join(CYCLE_EVENTS_FILE),
        cycle_chart: dir.join(CYCLE_CHART_FILE),
    };

    write_file(&paths.full_series, |w| write_full_table(w, result.series()))?;
    write_file(&paths.filtered_series, |w| {
        write_filtered_table(w, result.smoothed())
    })?;
    write_file(&paths.cycle_events, |w| write_events(w, result.events()))?;
    write_chart(&paths.cycle_chart, result)?;

    info!("report written to {}", dir.display());
    Ok(paths)
}
