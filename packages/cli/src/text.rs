//! Plain-text rendering of panel frames for the terminal.

use std::fmt::Write as _;

use tourism_map_dashboard_models::calendar::{month_abbr, month_name};
use tourism_map_views::line::LinePoint;
use tourism_map_views::{
    BarsScene, LineScene, MapScene, PanelFrame, PanelScene, ScatterScene, format_count,
    format_value,
};

/// Width of the longest bar, in characters.
const BAR_WIDTH: usize = 30;

fn period(year: Option<i32>, month: u8) -> String {
    let month = month_name(month).unwrap_or("?");
    year.map_or_else(|| month.to_string(), |y| format!("{month} {y}"))
}

fn map_text(out: &mut String, scene: &MapScene) {
    let _ = writeln!(
        out,
        "Map: {}, {}",
        scene.metric.label(),
        period(scene.year, scene.month)
    );
    let mut regions: Vec<_> = scene.regions.iter().collect();
    regions.sort_by(|a, b| {
        b.value
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&a.value.unwrap_or(f64::NEG_INFINITY))
            .then_with(|| a.label.cmp(&b.label))
    });
    for region in regions {
        let _ = writeln!(
            out,
            "{} {:<36} {:>12}  {}",
            if region.selected { '*' } else { ' ' },
            region.label,
            format_value(region.value),
            region.fill
        );
    }
}

fn series_text(points: &[LinePoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", month_abbr(p.month).unwrap_or("?"), format_count(p.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn line_text(out: &mut String, scene: &LineScene) {
    let year = scene.year.map_or_else(|| "no year".to_string(), |y| y.to_string());
    let _ = writeln!(out, "Monthly {} ({year})", scene.metric.label().to_lowercase());
    let _ = writeln!(out, "  Croatia: {}", series_text(&scene.national));
    if let Some(region) = &scene.region {
        let _ = writeln!(out, "  {}: {}", region.label, series_text(&region.points));
    }
    let marker = if scene.marker.present {
        format_count(scene.marker.value)
    } else {
        "no data".to_string()
    };
    let _ = writeln!(
        out,
        "  Selected month: {} ({marker})",
        month_name(scene.marker.month).unwrap_or("?")
    );
}

fn bars_text(out: &mut String, scene: &BarsScene) {
    match scene {
        BarsScene::Empty { message } => {
            let _ = writeln!(out, "Origins: {message}");
        }
        BarsScene::Ranked {
            region_label,
            year,
            month,
            metric,
            bars,
            x_max,
            ..
        } => {
            let _ = writeln!(
                out,
                "Top origins for {region_label}: {}, {}",
                metric.label(),
                period(*year, *month)
            );
            for bar in bars {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let width = if *x_max > 0.0 {
                    ((bar.length() / x_max) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                let _ = writeln!(
                    out,
                    "  {:<24} {:<pad$} {}",
                    bar.country,
                    "#".repeat(width),
                    format_value(bar.value),
                    pad = BAR_WIDTH
                );
            }
        }
    }
}

fn scatter_text(out: &mut String, scene: &ScatterScene) {
    match scene {
        ScatterScene::Cleared { reason } => {
            let _ = writeln!(out, "Intensity: {reason}");
        }
        ScatterScene::Plot {
            region_label,
            year,
            points,
            ..
        } => {
            let _ = writeln!(out, "Intensity in {region_label} ({year})");
            let _ = writeln!(
                out,
                "  {:<28} {:>14} {:>14} {:>8}",
                "Settlement", "Nights/100 inh", "Nights/km2", "Beds"
            );
            for point in points {
                let _ = writeln!(
                    out,
                    "  {:<28} {:>14} {:>14} {:>8}",
                    point.settlement,
                    format_count(point.x),
                    format_count(point.y),
                    format_value(point.beds)
                );
            }
        }
    }
}

/// Renders `frames` one panel after another, separated by blank lines.
#[must_use]
pub fn render_text(frames: &[PanelFrame]) -> String {
    let mut out = String::new();
    for (i, frame) in frames.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match &frame.scene {
            PanelScene::Map(scene) => map_text(&mut out, scene),
            PanelScene::Line(scene) => line_text(&mut out, scene),
            PanelScene::Bars(scene) => bars_text(&mut out, scene),
            PanelScene::Scatter(scene) => scatter_text(&mut out, scene),
        }
    }
    out
}
