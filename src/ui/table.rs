use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;

const HEADER_HEIGHT: f32 = 22.0;
const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Record table
// ---------------------------------------------------------------------------

/// Render the rows of `view` with the dataset's column order. No index column.
///
/// `id` keeps the column widths of separate tables on one page apart.
pub fn records_table(ui: &mut Ui, id: &str, view: FilteredView<'_>, max_height: f32) {
    if view.columns().is_empty() {
        ui.label("A planilha não possui colunas.");
        return;
    }

    if view.is_empty() {
        ui.label("Nenhum registro encontrado.");
    }

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(max_height)
                .columns(Column::auto().at_least(70.0), view.columns().len())
                .header(HEADER_HEIGHT, |mut header| {
                    for name in view.columns() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, view.len(), |mut row| {
                        let cells = &view.dataset.rows[view.indices[row.index()]];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.add(egui::Label::new(cell.to_string()).truncate());
                            });
                        }
                    });
                });
        });
    });

    ui.label(format!("{} registro(s)", view.len()));
}
