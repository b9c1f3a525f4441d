use std::path::Path;

use plotters::prelude::*;

use crate::error::ReportError;
use crate::projector::Projection;
use crate::session::ThemeMode;

const PLOT_WIDTH: u32 = 900;
const PLOT_HEIGHT: u32 = 600;

// Text is deliberately absent from the raster plot: captions and axis labels
// live in the report body, which keeps the renderer free of any font backend.
fn palette(mode: ThemeMode) -> (RGBColor, RGBColor, RGBColor) {
    match mode {
        ThemeMode::Dark => (
            RGBColor(24, 24, 28),
            RGBColor(85, 255, 85),
            RGBColor(255, 85, 85),
        ),
        ThemeMode::Light => (
            RGBColor(255, 255, 255),
            RGBColor(0, 150, 60),
            RGBColor(215, 40, 40),
        ),
    }
}

// Axis bounds with a little padding; degenerate ranges widen to a unit span.
fn bounds(points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let pad_axis = |min: f64, max: f64| {
        if !min.is_finite() || !max.is_finite() {
            return (-1.0, 1.0);
        }
        let span = max - min;
        if span <= f64::EPSILON {
            (min - 1.0, max + 1.0)
        } else {
            (min - span * 0.05, max + span * 0.05)
        }
    };
    (pad_axis(x_min, x_max), pad_axis(y_min, y_max))
}

/// Render the projection as a PNG scatter at `path`. Fraud points draw on top
/// of normal ones, red and slightly larger. `flags` is matched to points by
/// index; missing entries count as normal.
pub fn render_scatter(
    projection: &Projection,
    flags: &[bool],
    mode: ThemeMode,
    path: &Path,
) -> Result<(), ReportError> {
    let (bg, normal, fraud) = palette(mode);
    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&bg)
        .map_err(|e| ReportError::Render(e.to_string()))?;

    let ((x_min, x_max), (y_min, y_max)) = bounds(&projection.points);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| ReportError::Render(e.to_string()))?;

    let flagged = |i: usize| flags.get(i).copied().unwrap_or(false);

    chart
        .draw_series(
            projection
                .points
                .iter()
                .enumerate()
                .filter(move |(i, _)| !flagged(*i))
                .map(|(_, &(x, y))| Circle::new((x, y), 3, normal.mix(0.8).filled())),
        )
        .map_err(|e| ReportError::Render(e.to_string()))?;
    chart
        .draw_series(
            projection
                .points
                .iter()
                .enumerate()
                .filter(move |(i, _)| flagged(*i))
                .map(|(_, &(x, y))| Circle::new((x, y), 4, fraud.mix(0.8).filled())),
        )
        .map_err(|e| ReportError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| ReportError::Render(e.to_string()))?;
    Ok(())
}
