use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::DateRange;
use crate::data::model::{Dimension, SalesRecord};
use crate::pages::Page;
use crate::state::PageState;

/// A sidebar interaction, applied after the widgets are drawn.
enum FilterEdit {
    Toggle(Dimension, String),
    SelectAll(Dimension),
    Clear(Dimension),
    Dates(DateRange),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel<R: SalesRecord>(ui: &mut Ui, page: &mut PageState<R>) {
    ui.heading("Please Filter Here:");
    ui.separator();

    let Some(table) = page.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut edits: Vec<FilterEdit> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Per-dimension multi-selects (collapsible) ----
            for control in page.spec.filters {
                let dim = control.dimension;
                let Some(all_values) = table.domain(dim) else {
                    continue;
                };
                let selected = page.filters.selection(dim);
                let n_selected = selected.map_or(all_values.len(), |s| s.len());
                let header_text = format!("{}  ({n_selected}/{})", control.prompt, all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                edits.push(FilterEdit::SelectAll(dim));
                            }
                            if ui.small_button("None").clicked() {
                                edits.push(FilterEdit::Clear(dim));
                            }
                        });

                        for val in all_values {
                            let mut checked = selected.map_or(true, |s| s.contains(val));
                            if ui.checkbox(&mut checked, val.as_str()).changed() {
                                edits.push(FilterEdit::Toggle(dim, val.clone()));
                            }
                        }
                    });
            }

            // ---- Date range ----
            if page.spec.date_range {
                if let Some(current) = page.filters.date_range() {
                    ui.separator();
                    ui.strong("Select a date range:");
                    let mut start = current.start;
                    let mut end = current.end;
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("From");
                        ui.add(DatePickerButton::new(&mut start).id_salt("date_start"));
                    });
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("To");
                        ui.add(DatePickerButton::new(&mut end).id_salt("date_end"));
                    });
                    if start != current.start || end != current.end {
                        edits.push(FilterEdit::Dates(DateRange::new(start, end)));
                    }
                }
            }
        });

    // Apply after drawing so the widgets above only borrow the page immutably.
    for edit in edits {
        match edit {
            FilterEdit::Toggle(dim, value) => page.toggle_value(dim, &value),
            FilterEdit::SelectAll(dim) => page.select_all(dim),
            FilterEdit::Clear(dim) => page.select_none(dim),
            FilterEdit::Dates(range) => page.set_date_range(range),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// What the user asked for from the menu bar this frame.
pub enum TopBarAction {
    Open(PathBuf),
}

/// Render the top menu / toolbar: page switcher, file menu, row counts.
pub fn top_bar<R: SalesRecord>(
    ui: &mut Ui,
    active: &mut Page,
    page: &PageState<R>,
) -> Option<TopBarAction> {
    let mut action = None;
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                action = open_file_dialog().map(TopBarAction::Open);
                ui.close_menu();
            }
        });

        ui.separator();

        for p in Page::ALL {
            ui.selectable_value(active, p, p.label())
                .on_hover_text(p.spec().title);
        }

        ui.separator();

        if let Some(table) = &page.table {
            ui.label(format!(
                "{} rows loaded, {} visible",
                table.len(),
                page.visible_rows
            ));
            if table.dropped_rows() > 0 {
                ui.label(
                    RichText::new(format!("({} incomplete rows skipped)", table.dropped_rows()))
                        .weak(),
                );
            }
        }

        if let Some(msg) = &page.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
    action
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter(
            "Supported files",
            &["csv", "tsv", "txt", "xlsx", "xlsm", "xlsb", "xls", "ods", "parquet", "pq"],
        )
        .add_filter("CSV", &["csv", "tsv", "txt"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}
