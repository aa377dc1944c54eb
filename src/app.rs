use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, Page};
use crate::ui::{login, pages, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Access gate: only the login form until the session opens ----
        if !self.state.session.is_authenticated() {
            egui::CentralPanel::default().show(ctx, |ui| {
                login::login_page(ui, &mut self.state);
            });
            return;
        }

        // ---- Left side panel: navigation ----
        egui::SidePanel::left("menu_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Logged out from the menu this frame.
        if !self.state.session.is_authenticated() {
            ctx.request_repaint();
            return;
        }

        // ---- Bottom panel: status line ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.page {
                    Page::Home => pages::home_page(ui),
                    Page::Database => pages::database_page(ui, &self.state),
                    Page::Filters => pages::filters_page(ui, &mut self.state),
                    Page::Summary => pages::summary_page(ui, &mut self.state),
                });
        });
    }
}
