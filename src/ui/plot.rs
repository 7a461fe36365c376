use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::{ColorMap, BAR_COLOR};
use crate::data::aggregate::{ChartKind, ChartSeries, GroupKey};

const CHART_HEIGHT: f32 = 300.0;
/// Inner radius of a donut relative to its outer radius.
const DONUT_HOLE: f64 = 0.5;
/// Polygon vertices per full turn of a slice arc.
const ARC_STEPS: usize = 96;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render one chart series with its title.
pub fn chart(ui: &mut Ui, series: &ChartSeries) {
    ui.label(RichText::new(series.spec.title).strong().size(16.0));
    match series.spec.kind {
        ChartKind::HorizontalBar => bar_chart(ui, series, true),
        ChartKind::VerticalBar => bar_chart(ui, series, false),
        ChartKind::Donut => share_chart(ui, series, DONUT_HOLE),
        ChartKind::Pie => share_chart(ui, series, 0.0),
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Where a bar sits on the category axis: the hour itself for hourly charts,
/// the series position otherwise (keeps the value ordering on screen).
fn bar_position(index: usize, key: &GroupKey) -> f64 {
    match key {
        GroupKey::Hour(h) => *h as f64,
        GroupKey::Value(_) => index as f64,
    }
}

fn bar_chart(ui: &mut Ui, series: &ChartSeries, horizontal: bool) {
    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            Bar::new(bar_position(i, key), *value)
                .name(key.to_string())
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();

    let mut chart = BarChart::new(bars).color(BAR_COLOR).name("Total");
    if horizontal {
        chart = chart.horizontal();
    }

    Plot::new(series.spec.title)
        .height(CHART_HEIGHT)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            // category labels next to the bars
            if horizontal {
                for (i, (key, _)) in series.points.iter().enumerate() {
                    plot_ui.text(
                        Text::new(PlotPoint::new(0.0, i as f64), key.to_string())
                            .anchor(eframe::egui::Align2::LEFT_CENTER)
                            .color(Color32::WHITE),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Donut / pie charts
// ---------------------------------------------------------------------------

/// Fraction of the whole held by each value. Empty when nothing is positive.
pub fn shares(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    values.iter().map(|v| v.max(0.0) / total).collect()
}

/// Outline of a ring segment between two angles (radians, counter-clockwise).
/// With `inner == 0` the segment is a pie wedge.
pub fn ring_segment(start: f64, end: f64, inner: f64, outer: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start).abs() / TAU) * ARC_STEPS as f64).ceil().max(1.0) as usize;
    let arc = |radius: f64| {
        (0..=steps).map(move |k| {
            let angle = start + (end - start) * k as f64 / steps as f64;
            [radius * angle.cos(), radius * angle.sin()]
        })
    };

    let mut points: Vec<[f64; 2]> = arc(outer).collect();
    if inner > 0.0 {
        let mut back: Vec<[f64; 2]> = arc(inner).collect();
        back.reverse();
        points.extend(back);
    } else {
        points.push([0.0, 0.0]);
    }
    points
}

fn share_chart(ui: &mut Ui, series: &ChartSeries, hole: f64) {
    let values: Vec<f64> = series.points.iter().map(|(_, v)| *v).collect();
    let fractions = shares(&values);
    let colors = ColorMap::new(series.points.iter().map(|(k, _)| k));

    Plot::new(series.spec.title)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // clockwise from twelve o'clock, largest share first
            let mut angle = FRAC_PI_2;
            for ((key, _), fraction) in series.points.iter().zip(&fractions) {
                let end = angle - fraction * TAU;
                let outline: PlotPoints = ring_segment(angle, end, hole, 1.0).into();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .name(key.to_string())
                        .fill_color(colors.color_for(key))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );

                let mid = (angle + end) / 2.0;
                let radius = (1.0 + hole) / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(radius * mid.cos(), radius * mid.sin()),
                        format!("{:.1}%", fraction * 100.0),
                    )
                    .color(Color32::WHITE),
                );
                angle = end;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_sum_to_one() {
        let fractions = shares(&[30.0, 10.0, 60.0]);
        assert_eq!(fractions, vec![0.3, 0.1, 0.6]);
        assert!((fractions.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(shares(&[0.0, 0.0]).is_empty());
        assert!(shares(&[]).is_empty());
    }

    #[test]
    fn pie_wedge_closes_at_the_centre() {
        let wedge = ring_segment(0.0, FRAC_PI_2, 0.0, 1.0);
        assert_eq!(wedge.last(), Some(&[0.0, 0.0]));
        let first = wedge[0];
        assert!((first[0] - 1.0).abs() < 1e-12 && first[1].abs() < 1e-12);
    }

    #[test]
    fn donut_segment_returns_along_the_inner_arc() {
        let segment = ring_segment(0.0, -TAU / 4.0, 0.5, 1.0);
        // outer and inner arcs have the same number of vertices
        assert_eq!(segment.len() % 2, 0);
        let last = segment[segment.len() - 1];
        assert!((last[0] - 0.5).abs() < 1e-12 && last[1].abs() < 1e-12);
        for p in &segment {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!(r > 0.49 && r < 1.01);
        }
    }

    #[test]
    fn hourly_bars_sit_on_their_hour() {
        assert_eq!(bar_position(0, &GroupKey::Hour(13)), 13.0);
        assert_eq!(bar_position(2, &GroupKey::Value("Furniture".into())), 2.0);
    }
}
