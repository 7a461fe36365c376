use eframe::egui::{RichText, Ui};

use crate::data::aggregate::Kpis;
use crate::data::model::SalesRecord;
use crate::state::PageState;
use crate::ui::plot;

const STAR: &str = "⭐";

// ---------------------------------------------------------------------------
// KPI formatting
// ---------------------------------------------------------------------------

/// Integer with comma thousands separators: `1234567` → `"1,234,567"`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Total sales shown as whole dollars (fraction truncated).
pub fn format_total_sales(total: f64) -> String {
    format!("US $ {}", format_thousands(total.trunc() as i64))
}

pub fn format_rating(kpis: &Kpis) -> String {
    format!("{:.1} {}", kpis.average_rating, STAR.repeat(kpis.star_rating as usize))
}

pub fn format_average_sale(average: f64) -> String {
    format!("US $ {average:.2}")
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the page body: KPIs and charts, or the reason there are none.
pub fn central_panel<R: SalesRecord>(ui: &mut Ui, page: &PageState<R>) {
    ui.heading(RichText::new(format!("📊 {}", page.spec.title)).size(28.0));
    ui.add_space(8.0);

    if page.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            match &page.status_message {
                Some(msg) => ui.heading(msg),
                None => ui.heading("Open a data file to view the dashboard  (File → Open…)"),
            };
        });
        return;
    }

    let Some(report) = page.summary.report() else {
        ui.add_space(24.0);
        ui.heading("👈 Please adjust the filters: no rows match the current selection.");
        return;
    };

    ui.columns(3, |cols: &mut [Ui]| {
        kpi(&mut cols[0], "Total Sales:", format_total_sales(report.kpis.total_sales));
        kpi(&mut cols[1], "Average Rating:", format_rating(&report.kpis));
        kpi(
            &mut cols[2],
            "Average Sales Per Transaction:",
            format_average_sale(report.kpis.average_sale),
        );
        cols[2].label(
            RichText::new(format!(
                "over {} transactions",
                format_thousands(report.kpis.transactions as i64)
            ))
            .weak(),
        );
    });
    ui.separator();

    eframe::egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for pair in report.charts.chunks(2) {
                ui.columns(2, |cols: &mut [Ui]| {
                    for (col, series) in cols.iter_mut().zip(pair) {
                        plot::chart(col, series);
                    }
                });
                ui.add_space(12.0);
            }
        });
}

fn kpi(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).size(18.0).strong());
    ui.label(RichText::new(value).size(18.0));
}
