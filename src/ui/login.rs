use eframe::egui::{self, Color32, Key, RichText, Ui};

use crate::state::{AppState, Status};

/// Render the login form. Nothing else is reachable until it succeeds.
pub fn login_page(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(60.0);
        ui.heading("🔐 Login");
        ui.add_space(12.0);

        ui.set_max_width(280.0);
        ui.label("Usuário");
        ui.text_edit_singleline(&mut state.login_form.username);
        ui.label("Senha");
        let password =
            ui.add(egui::TextEdit::singleline(&mut state.login_form.password).password(true));

        let submitted = password.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        ui.add_space(8.0);
        if ui.button("Entrar").clicked() || submitted {
            state.submit_login();
        }

        match &state.login_status {
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            Some(Status::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::GREEN));
            }
            None => {}
        }
    });
}
