// monitoring/report.rs

use crate::shared_data::{CongestionLevel, TrafficEvent};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no traffic events to report")]
    NoData,

    #[error("chart rendering failed: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ReportError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ReportError::Render(e.to_string())
    }
}

/// Event totals in Low, Medium, High order.
pub fn level_totals(events: &[TrafficEvent]) -> [usize; 3] {
    let mut totals = [0; 3];
    for event in events {
        let slot = match event.congestion_level() {
            CongestionLevel::Low => 0,
            CongestionLevel::Medium => 1,
            CongestionLevel::High => 2,
        };
        totals[slot] += 1;
    }
    totals
}

fn level_color(level: CongestionLevel) -> RGBColor {
    match level {
        CongestionLevel::Low => RGBColor(46, 160, 67),
        CongestionLevel::Medium => RGBColor(230, 160, 30),
        CongestionLevel::High => RGBColor(210, 45, 45),
    }
}

const CHART_SIZE: (u32, u32) = (800, 600);

fn level_label(value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => CongestionLevel::ALL
            .get(*i as usize)
            .map(|level| level.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Renders a bar chart of events per congestion level to a PNG file.
pub fn render_congestion_chart<P: AsRef<Path>>(
    path: P,
    events: &[TrafficEvent],
) -> Result<(), ReportError> {
    if events.is_empty() {
        return Err(ReportError::NoData);
    }
    let root = BitMapBackend::new(path.as_ref(), CHART_SIZE).into_drawing_area();
    draw_congestion_chart(&root, events, true)?;
    log::info!("[Report] congestion chart saved to {}", path.as_ref().display());
    Ok(())
}

/// Draws the per-level bars onto any plotters area. `with_text` adds the
/// caption, axis descriptions and level labels, which need system fonts.
pub fn draw_congestion_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    events: &[TrafficEvent],
    with_text: bool,
) -> Result<(), ReportError> {
    if events.is_empty() {
        return Err(ReportError::NoData);
    }
    let totals = level_totals(events);
    let y_max = totals.iter().copied().max().unwrap_or(0) as u32 + 1;

    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(root);
    builder.margin(40);
    if with_text {
        builder
            .caption(
                format!("Traffic Events by Congestion Level ({} total)", events.len()),
                ("sans-serif", 20),
            )
            .x_label_area_size(40)
            .y_label_area_size(40);
    }
    let mut chart = builder.build_cartesian_2d((0u32..3u32).into_segmented(), 0u32..y_max)?;

    if with_text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Congestion level")
            .y_desc("Events")
            .x_label_formatter(&level_label)
            .draw()?;
    }

    chart.draw_series(CongestionLevel::ALL.iter().enumerate().map(|(i, &level)| {
        let slot = i as u32;
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(slot), 0),
                (SegmentValue::Exact(slot + 1), totals[i] as u32),
            ],
            level_color(level).filled(),
        );
        bar.set_margin(0, 0, 20, 20);
        bar
    }))?;

    root.present()?;
    Ok(())
}
