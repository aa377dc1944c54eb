use eframe::egui::{self, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::{DeliveryStatus, FilterCriteria};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Criteria widgets
// ---------------------------------------------------------------------------

/// Which criteria a page exposes.
#[derive(Debug, Clone, Copy)]
pub struct Controls {
    pub company: bool,
    pub plate: bool,
    pub client: bool,
    pub delivery: bool,
}

/// Render the page's filter widgets. Returns `true` if any criterion changed.
///
/// A dropdown is only shown when its column exists in the dataset; options
/// come from the full dataset, not from the other filters.
pub fn criteria_controls(
    ui: &mut Ui,
    id: &str,
    dataset: &Dataset,
    criteria: &mut FilterCriteria,
    controls: Controls,
) -> bool {
    let roles = dataset.roles;
    let mut changed = false;

    if controls.company && roles.company.is_some() {
        let options = dataset.choices(roles.company);
        let combo_id = format!("{id}_company");
        changed |= choice_combo(
            ui,
            &combo_id,
            "Empresa:",
            "Todas",
            &options,
            &mut criteria.company,
        );
    }
    if controls.plate && roles.plate.is_some() {
        let options = dataset.choices(roles.plate);
        let combo_id = format!("{id}_plate");
        changed |= choice_combo(
            ui,
            &combo_id,
            "Placa:",
            "Todas",
            &options,
            &mut criteria.plate,
        );
    }
    if controls.client && roles.client.is_some() {
        let options = dataset.choices(roles.client);
        let combo_id = format!("{id}_client");
        changed |= choice_combo(
            ui,
            &combo_id,
            "Cliente:",
            "Todos",
            &options,
            &mut criteria.client,
        );
    }

    if let Some(range) = criteria.date_range.as_mut() {
        ui.columns(2, |cols| {
            cols[0].label("Data inicial");
            changed |= cols[0]
                .add(DatePickerButton::new(&mut range.start).id_salt(&format!("{id}_start")))
                .changed();
            cols[1].label("Data final");
            changed |= cols[1]
                .add(DatePickerButton::new(&mut range.end).id_salt(&format!("{id}_end")))
                .changed();
        });
    } else if roles.date.is_some() {
        ui.label("Nenhuma data válida na planilha.");
    }

    if controls.delivery {
        let before = criteria.delivery;
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Entrega:");
            egui::ComboBox::from_id_salt(format!("{id}_delivery"))
                .selected_text(criteria.delivery.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for status in DeliveryStatus::ALL {
                        ui.selectable_value(&mut criteria.delivery, status, status.label());
                    }
                });
        });
        changed |= criteria.delivery != before;
    }

    changed
}

/// Dropdown with an "all" sentinel entry mapped to `None`.
fn choice_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    all_label: &str,
    options: &[String],
    selected: &mut Option<String>,
) -> bool {
    let before = selected.clone();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        let current = selected.as_deref().unwrap_or(all_label).to_string();
        egui::ComboBox::from_id_salt(id)
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(selected, None, all_label);
                for option in options {
                    ui.selectable_value(selected, Some(option.clone()), option);
                }
            });
    });
    *selected != before
}
