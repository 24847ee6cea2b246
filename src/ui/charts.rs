use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints};

use titanic_dashboard::data::aggregate::{box_by, count_by, histogram_by, CountTable};
use titanic_dashboard::data::{CellValue, Table};

use crate::color::ColorMap;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Visual insights (central panel)
// ---------------------------------------------------------------------------

/// Render every chart whose columns exist in the current view.
pub fn visual_insights(ui: &mut Ui, state: &AppState) {
    let (Some(view), Some(colors)) = (&state.view, &state.hue_colors) else {
        ui.label("Charts need a 'Survived' column.");
        return;
    };

    if let Some(counts) = count_by(view, "Sex", "Survived") {
        ui.strong("Survival by Gender");
        count_chart(ui, "survival_by_gender", &counts, colors);
    }
    if view.has_column("Age") {
        ui.strong("Age Distribution vs Survival");
        age_chart(ui, view, colors);
    }
    if let Some(counts) = count_by(view, "Pclass", "Survived") {
        ui.strong("Survival by Passenger Class");
        count_chart(ui, "survival_by_class", &counts, colors);
    }
    if view.has_column("Fare") {
        ui.strong("Fare vs Survival");
        fare_chart(ui, view, colors);
    }
}

/// Axis formatter showing category labels at integer positions.
fn category_axis(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn series_name(colors: &ColorMap, level: &CellValue) -> String {
    format!("{}: {level}", colors.column)
}

/// Grouped bars: one group per x level, one bar per hue level.
fn count_chart(ui: &mut Ui, id: &str, counts: &CountTable, colors: &ColorMap) {
    let n_hues = counts.hue_levels.len().max(1);
    let bar_width = 0.8 / n_hues as f64;
    let labels: Vec<String> = counts.x_levels.iter().map(|v| v.to_string()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (h, hue) in counts.hue_levels.iter().enumerate() {
                let offset = (h as f64 - (n_hues as f64 - 1.0) / 2.0) * bar_width;
                let bars: Vec<Bar> = counts
                    .counts
                    .iter()
                    .enumerate()
                    .map(|(x, row)| Bar::new(x as f64 + offset, row[h] as f64).width(bar_width))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(series_name(colors, hue))
                        .color(colors.color_for(hue)),
                );
            }
        });
}

/// Overlaid histograms with a density curve per hue.
fn age_chart(ui: &mut Ui, view: &Table, colors: &ColorMap) {
    let Some(hist) = histogram_by(view, "Age", "Survived") else {
        return;
    };
    let width = hist.bin_width();

    Plot::new("age_distribution")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Age")
        .y_axis_label("count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for group in &hist.groups {
                let color = colors.color_for(&group.hue);
                let name = series_name(colors, &group.hue);
                let bars: Vec<Bar> = group
                    .counts
                    .iter()
                    .zip(&hist.edges)
                    .map(|(&count, &left)| Bar::new(left + width / 2.0, count as f64).width(width))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(&name)
                        .color(color.gamma_multiply(0.5)),
                );
                if let Some(curve) = &group.kde {
                    let points: PlotPoints = curve.iter().copied().collect();
                    plot_ui.line(Line::new(points).name(&name).color(color).width(2.0));
                }
            }
        });
}

/// One box per survival outcome.
fn fare_chart(ui: &mut Ui, view: &Table, colors: &ColorMap) {
    let Some(boxes) = box_by(view, "Survived", "Fare") else {
        return;
    };
    let labels: Vec<String> = boxes.iter().map(|(level, _)| level.to_string()).collect();

    Plot::new("fare_vs_survival")
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Fare")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (level, summary)) in boxes.iter().enumerate() {
                let color = colors.color_for(level);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .box_width(0.6)
                .fill(color.gamma_multiply(0.5))
                .stroke((1.5, color))
                .name(series_name(colors, level));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(series_name(colors, level)));

                if !summary.outliers.is_empty() {
                    let points: PlotPoints = summary.outliers.iter().map(|&y| [i as f64, y]).collect();
                    plot_ui.points(
                        egui_plot::Points::new(points)
                            .radius(2.0)
                            .color(Color32::DARK_GRAY),
                    );
                }
            }
        });
}
