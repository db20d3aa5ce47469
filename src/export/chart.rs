//! SVG chart of a pipeline run: retained values, smoothed line, and one
//! vertical marker per cycle event.

use crate::cycle::CycleLabel;
use crate::error::Result;
use crate::pipeline::PipelineResult;
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub const CHART_SIZE: (u32, u32) = (1400, 700);

const RAW_COLOR: RGBColor = RGBColor(135, 206, 235);
const SMOOTHED_COLOR: RGBColor = RGBColor(255, 165, 0);
const CUT_COLOR: RGBColor = RGBColor(220, 20, 20);
const GROWTH_OR_CUT_COLOR: RGBColor = RGBColor(128, 0, 128);

/// Dash length and gap of the marker drawn for a label.
fn marker_dashes(label: CycleLabel) -> (u32, u32) {
    match label {
        CycleLabel::Cut => (12, 4),
        CycleLabel::GrowthOrCut => (6, 6),
    }
}

fn marker_style(label: CycleLabel) -> ShapeStyle {
    match label {
        CycleLabel::Cut => CUT_COLOR.stroke_width(2),
        CycleLabel::GrowthOrCut => GROWTH_OR_CUT_COLOR.stroke_width(2),
    }
}

/// Value range covering raw and smoothed values, padded by 5%.
fn value_range(result: &PipelineResult) -> (f64, f64) {
    let values = result
        .filtered_table()
        .into_iter()
        .flat_map(|(_, value, smoothed)| std::iter::once(value).chain(smoothed))
        .filter(|v| v.is_finite());

    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return (0.0, 1.0);
    }

    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.05 };
    (lo - pad, hi + pad)
}

/// Draw the chart onto any plotters drawing area.
pub fn draw_chart<DB>(root: DrawingArea<DB, Shift>, result: &PipelineResult) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let rows = result.filtered_table();
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => {
            let today = NaiveDate::default();
            (today, today)
        }
    };
    let (y_lo, y_hi) = value_range(result);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Biomass time series", ("sans-serif", 24))
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(
            (first - Duration::days(1))..(last + Duration::days(1)),
            y_lo..y_hi,
        )?;

    chart
        .configure_mesh()
        .x_labels(10)
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .x_desc("Date")
        .y_desc("Biomass")
        .light_line_style(RGBColor(200, 200, 200).mix(0.5))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|&(date, value, _)| (date, value)),
            RAW_COLOR.mix(0.6).stroke_width(1),
        ))?
        .label("Original biomass")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], RAW_COLOR.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            rows.iter()
                .filter_map(|&(date, _, smoothed)| smoothed.map(|s| (date, s))),
            SMOOTHED_COLOR.stroke_width(2),
        ))?
        .label("Smoothed biomass")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 30, y)], SMOOTHED_COLOR.stroke_width(2))
        });

    for label in [CycleLabel::Cut, CycleLabel::GrowthOrCut] {
        let dates: Vec<NaiveDate> = result
            .events()
            .iter()
            .filter(|e| e.label == label)
            .map(|e| e.date)
            .collect();
        if dates.is_empty() {
            continue;
        }

        let style = marker_style(label);
        let (dash, gap) = marker_dashes(label);
        chart
            .draw_series(dates.iter().flat_map(|&date| {
                DashedLineSeries::new(vec![(date, y_lo), (date, y_hi)], dash, gap, style)
            }))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render the chart as an SVG document.
pub fn render_chart(result: &PipelineResult) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw_chart(root, result)?;
    }
    Ok(svg)
}

/// Write the chart as an SVG file.
pub fn write_chart(path: &Path, result: &PipelineResult) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    draw_chart(root, result)
}
