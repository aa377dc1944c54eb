use std::path::Path;

use eframe::egui::{Color32, RichText, Ui};

use crate::export::ExportError;
use crate::state::{AppState, Page, Status};

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the sidebar menu.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📌 Menu");
    ui.separator();

    ui.label("Navegação");
    let mut selected = state.page;
    for page in Page::ALL {
        ui.radio_value(&mut selected, page, page.label());
    }
    state.navigate(selected);

    ui.separator();

    if let Some(user) = state.session.user() {
        ui.label(format!("Usuário: {user}"));
    }
    if let Some(Status::Info(msg)) = &state.login_status {
        ui.label(RichText::new(msg).color(Color32::GREEN));
    }
    if ui.button("🔄 Recarregar planilha").clicked() {
        state.reload_dataset();
    }
    if ui.button("Sair").clicked() {
        state.logout();
    }
}

// ---------------------------------------------------------------------------
// Bottom bar
// ---------------------------------------------------------------------------

/// Render the status line: dataset size and the last message.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        match &state.dataset {
            Some(ds) => {
                ui.label(format!(
                    "{} registros carregados de {}",
                    ds.len(),
                    state.config.data_path.display()
                ));
            }
            None => {
                ui.label("Nenhuma planilha carregada.");
            }
        }

        ui.separator();

        match &state.status_message {
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            Some(Status::Info(msg)) => {
                ui.label(msg);
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Save dialog
// ---------------------------------------------------------------------------

/// Ask where to save an export and write it, reporting into `status`.
///
/// `build` only runs once the user has picked a destination.
pub fn save_export<F>(
    status: &mut Option<Status>,
    file_name: &str,
    mime: &str,
    filter_name: &str,
    extensions: &[&str],
    build: F,
) where
    F: FnOnce() -> Result<Vec<u8>, ExportError>,
{
    let Some(path) = rfd::FileDialog::new()
        .set_title("Salvar arquivo")
        .set_file_name(file_name)
        .add_filter(filter_name, extensions)
        .save_file()
    else {
        return;
    };

    let outcome = build()
        .map_err(|e| e.to_string())
        .and_then(|bytes| write_bytes(&path, &bytes));
    *status = Some(match outcome {
        Ok(()) => {
            log::info!("Saved {} ({mime})", path.display());
            Status::Info(format!("Arquivo salvo em {}", path.display()))
        }
        Err(e) => {
            log::error!("Export to {} failed: {e}", path.display());
            Status::Error(format!("Falha ao salvar: {e}"))
        }
    });
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), String> {
    std::fs::write(path, bytes).map_err(|e| e.to_string())
}
