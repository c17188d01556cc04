//! SVG line chart of the "drivers with at least x trips" distribution.

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::pipeline::FrequencyRow;

const CHART_SIZE: (u32, u32) = (1280, 720);
const LINE_COLOR: RGBColor = RGBColor(30, 144, 255);

/// Draws the distribution to an SVG file at `path`.
pub fn render_chart(path: impl AsRef<Path>, rows: &[FrequencyRow]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), points = rows.len(), "Rendering chart");

    let svg = chart_svg(rows)?;
    fs::write(path, svg)
        .with_context(|| format!("failed to write chart '{}'", path.display()))
}

/// The chart as an SVG document.
fn chart_svg(rows: &[FrequencyRow]) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, CHART_SIZE).into_drawing_area();
        draw_distribution(root, rows)?;
    }
    Ok(buf)
}

fn draw_distribution<DB>(root: DrawingArea<DB, Shift>, rows: &[FrequencyRow]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let points: Vec<(u32, u32)> = rows
        .iter()
        .map(|row| (row.nb_covoits_by_driver as u32, row.inverted_cumsum as u32))
        .collect();

    let x_max = points.iter().map(|(x, _)| *x).max().unwrap_or(0).max(1);
    let y_max = points.iter().map(|(_, y)| *y).max().unwrap_or(0).max(1);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Number of drivers with at least x trips", ("sans-serif", 28))
        .margin(25)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0u32..x_max + 1, 0u32..y_max + y_max / 10 + 1)?;

    chart
        .configure_mesh()
        .x_desc("number of trips")
        .y_desc("number of drivers")
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &LINE_COLOR))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, LINE_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn rows() -> Vec<FrequencyRow> {
        vec![
            FrequencyRow {
                nb_covoits_by_driver: 1,
                nb_driver: 4,
                inverted_cumsum: 6,
            },
            FrequencyRow {
                nb_covoits_by_driver: 3,
                nb_driver: 2,
                inverted_cumsum: 2,
            },
        ]
    }

    #[test]
    fn test_chart_svg_has_axis_labels() {
        let svg = chart_svg(&rows()).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("number of trips"));
        assert!(svg.contains("number of drivers"));
    }

    #[test]
    fn test_chart_svg_empty_distribution() {
        let svg = chart_svg(&[]).unwrap();
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_render_chart_writes_file() {
        let path = format!("{}/covoit_report_test_chart.svg", env::temp_dir().display());
        let _ = fs::remove_file(&path);

        render_chart(&path, &rows()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("<svg"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_render_chart_unwritable_path_fails() {
        let path = env::temp_dir()
            .join("covoit_report_no_such_dir")
            .join("chart.svg");

        let err = render_chart(&path, &rows()).unwrap_err();
        assert!(err.to_string().contains("failed to write chart"));
    }
}
