use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::FilteredView;
use crate::data::summary::SummaryMetrics;
use crate::export::{self, PDF_FILE_NAME, PDF_MIME, XLSX_FILE_NAME, XLSX_MIME};
use crate::state::AppState;
use crate::ui::filters::{Controls, criteria_controls};
use crate::ui::panels::save_export;
use crate::ui::table::records_table;

const FILTERS_PAGE_CONTROLS: Controls = Controls {
    company: true,
    plate: true,
    client: false,
    delivery: true,
};

const SUMMARY_PAGE_CONTROLS: Controls = Controls {
    company: true,
    plate: true,
    client: true,
    delivery: false,
};

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

pub fn home_page(ui: &mut Ui) {
    ui.heading("📊 Dashboard de Entregas");
    ui.label("Bem-vindo ao painel da empresa de entregas de areia.");
    ui.add_space(8.0);
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        let hint = "ℹ Use o menu lateral para navegar entre as páginas.";
        ui.label(RichText::new(hint).color(Color32::LIGHT_BLUE));
    });
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

pub fn database_page(ui: &mut Ui, state: &AppState) {
    ui.heading("📦 Banco de Dados — Entregas");
    let Some(ds) = &state.dataset else {
        no_dataset(ui);
        return;
    };
    if ds.is_empty() {
        ui.label("A planilha não contém registros.");
    }
    let all: Vec<usize> = (0..ds.len()).collect();
    records_table(ui, "database_table", FilteredView::new(ds, &all), 520.0);
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

pub fn filters_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filtros de Entregas");
    let Some(ds) = &state.dataset else {
        no_dataset(ui);
        return;
    };

    let page = &mut state.filters_page;
    if criteria_controls(ui, "filters", ds, &mut page.criteria, FILTERS_PAGE_CONTROLS) {
        page.refilter(ds);
    }

    ui.separator();
    ui.strong("📄 Resultados filtrados");
    let view = FilteredView::new(ds, &page.visible_indices);
    records_table(ui, "filters_table", view, 360.0);

    ui.add_space(8.0);
    if ui.button("📥 Baixar resultados em Excel (.xlsx)").clicked() {
        save_export(
            &mut state.status_message,
            XLSX_FILE_NAME,
            XLSX_MIME,
            "Excel",
            &["xlsx"],
            || export::view_to_xlsx(&view),
        );
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub fn summary_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📘 Resumo de Entregas");
    let Some(ds) = &state.dataset else {
        no_dataset(ui);
        return;
    };

    ui.strong("🔍 Filtros do Resumo");
    let page = &mut state.summary_page;
    if criteria_controls(ui, "summary", ds, &mut page.criteria, SUMMARY_PAGE_CONTROLS) {
        page.refilter(ds);
    }

    let view = FilteredView::new(ds, &page.visible_indices);
    let metrics = SummaryMetrics::compute(&view);

    ui.separator();
    ui.strong("📊 Indicadores Gerais");
    ui.columns(3, |cols| {
        metric_card(&mut cols[0], "Total de viagens", &metrics.trip_count.to_string());
        metric_card(&mut cols[1], "Total de m³ entregues", &metrics.quantity_card());
        metric_card(&mut cols[2], "Faturamento total", &metrics.invoice_card());
    });

    ui.separator();
    ui.strong("📄 Tabela usada no cálculo");
    records_table(ui, "summary_table", view, 280.0);

    ui.separator();
    ui.strong("🧾 Resumo Final");
    let report = metrics.report();
    ui.label(report.trim_matches('\n'));

    ui.add_space(8.0);
    if ui.button("📥 Baixar resumo em PDF").clicked() {
        save_export(
            &mut state.status_message,
            PDF_FILE_NAME,
            PDF_MIME,
            "PDF",
            &["pdf"],
            || export::report_to_pdf(&report),
        );
    }
}

fn metric_card(ui: &mut Ui, title: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.label(title);
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

fn no_dataset(ui: &mut Ui) {
    let notice = "Planilha indisponível. Verifique o arquivo e use \"Recarregar planilha\".";
    ui.label(RichText::new(notice).color(Color32::RED));
}
