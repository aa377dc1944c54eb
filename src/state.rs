use std::time::SystemTime;

use crate::auth::{AccessGate, LOGIN_SUCCESS_MESSAGE, Session};
use crate::config::AppConfig;
use crate::data::filter::{FilterCriteria, FilteredView, filtered_indices};
use crate::data::loader::load_file;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Database,
    Filters,
    Summary,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Database, Page::Filters, Page::Summary];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "🏠 Início",
            Page::Database => "📦 Banco de Dados",
            Page::Filters => "🔍 Filtros",
            Page::Summary => "📘 Resumo",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-page filter state
// ---------------------------------------------------------------------------

/// Criteria of one page plus the cached rows they select.
#[derive(Debug, Clone, Default)]
pub struct PageFilters {
    pub criteria: FilterCriteria,
    /// Indices of rows passing `criteria` (cached).
    pub visible_indices: Vec<usize>,
}

impl PageFilters {
    fn reset(&mut self, dataset: &Dataset) {
        self.criteria = FilterCriteria::with_dataset_dates(dataset);
        self.refilter(dataset);
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self, dataset: &Dataset) {
        self.visible_indices = filtered_indices(dataset, &self.criteria);
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Message shown under a widget, coloured by severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    pub gate: AccessGate,
    /// Authentication result; every page except login requires it open.
    pub session: Session,
    pub login_form: LoginForm,
    /// Outcome of the last login attempt.
    pub login_status: Option<Status>,

    pub page: Page,

    /// Loaded dataset (None until loaded or after a load failure).
    pub dataset: Option<Dataset>,
    /// Modification time of the source file when `dataset` was read.
    source_modified: Option<SystemTime>,

    pub filters_page: PageFilters,
    pub summary_page: PageFilters,

    /// Status / error message shown in the UI.
    pub status_message: Option<Status>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let gate = AccessGate::new(config.credentials.clone());
        Self {
            config,
            gate,
            session: Session::default(),
            login_form: LoginForm::default(),
            login_status: None,
            page: Page::default(),
            dataset: None,
            source_modified: None,
            filters_page: PageFilters::default(),
            summary_page: PageFilters::default(),
            status_message: None,
        }
    }

    /// Submit the login form. The password field is cleared either way.
    pub fn submit_login(&mut self) {
        let password = std::mem::take(&mut self.login_form.password);
        match self
            .session
            .login(&self.gate, &self.login_form.username, &password)
        {
            Ok(()) => {
                self.login_status = Some(Status::Info(LOGIN_SUCCESS_MESSAGE.to_string()));
                self.ensure_dataset();
            }
            Err(e) => {
                self.login_status = Some(Status::Error(e.to_string()));
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.login_form = LoginForm::default();
        self.login_status = None;
        self.page = Page::default();
    }

    pub fn navigate(&mut self, page: Page) {
        if self.page != page {
            log::debug!("Navigating to {page:?}");
            self.page = page;
            self.ensure_dataset();
        }
    }

    /// Load the dataset if it is missing or the source file changed on disk.
    pub fn ensure_dataset(&mut self) {
        let modified = std::fs::metadata(&self.config.data_path)
            .and_then(|m| m.modified())
            .ok();
        let stale = self.source_modified.is_none() || modified != self.source_modified;
        if self.dataset.is_none() || stale {
            self.reload_dataset();
        }
    }

    /// Read the source file again, resetting both pages' filters.
    pub fn reload_dataset(&mut self) {
        let path = self.config.data_path.clone();
        match load_file(&path, &self.config.columns) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    dataset.len(),
                    dataset.columns,
                    path.display()
                );
                self.source_modified =
                    std::fs::metadata(&path).and_then(|m| m.modified()).ok();
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.dataset = None;
                self.source_modified = None;
                self.status_message =
                    Some(Status::Error(format!("Erro ao carregar planilha: {e:#}")));
            }
        }
    }

    /// Ingest a newly loaded dataset and initialise both pages' filters.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters_page.reset(&dataset);
        self.summary_page.reset(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Rows currently selected on the Filters page.
    pub fn filters_view(&self) -> Option<FilteredView<'_>> {
        let ds = self.dataset.as_ref()?;
        Some(FilteredView::new(ds, &self.filters_page.visible_indices))
    }

    /// Rows currently selected on the Summary page.
    pub fn summary_view(&self) -> Option<FilteredView<'_>> {
        let ds = self.dataset.as_ref()?;
        Some(FilteredView::new(ds, &self.summary_page.visible_indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::DeliveryStatus;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tempfile::TempDir;

    const SHEET: &str = "DATA,EMPRESA,PLACAS,CLIENTE,DT.ENTREGA,QUANT.,V.NF\n\
                         2024-06-01,Areial,ABC1234,Obra Norte,2024-06-02,12,1500\n\
                         2024-06-03,Pedreira,XYZ9876,Obra Sul,,8,900\n\
                         ,Pedreira,XYZ9876,Obra Sul,,5,100\n";

    fn state_with_sheet(dir: &TempDir) -> AppState {
        let path = dir.path().join("entregas.csv");
        std::fs::write(&path, SHEET).unwrap();
        let config = AppConfig {
            data_path: path,
            ..AppConfig::default()
        };
        AppState::new(config)
    }

    fn log_in(state: &mut AppState) {
        state.login_form.username = "admin".to_string();
        state.login_form.password = "1234".to_string();
        state.submit_login();
    }

    #[test]
    fn test_wrong_login_keeps_gate_closed() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_sheet(&dir);
        state.login_form.username = "admin".to_string();
        state.login_form.password = "0000".to_string();
        state.submit_login();

        assert!(!state.session.is_authenticated());
        assert!(state.dataset.is_none());
        assert_eq!(
            state.login_status,
            Some(Status::Error("Usuário ou senha incorretos.".to_string()))
        );
        assert!(state.login_form.password.is_empty());
    }

    #[test]
    fn test_login_loads_dataset_with_default_dates() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_sheet(&dir);
        log_in(&mut state);

        assert!(state.session.is_authenticated());
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(3));
        // The row without DATA falls outside the default date range.
        assert_eq!(state.filters_page.visible_indices, vec![0, 1]);
        assert_eq!(state.summary_page.visible_indices, vec![0, 1]);
    }

    #[test]
    fn test_pages_filter_independently() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_sheet(&dir);
        log_in(&mut state);

        let ds = state.dataset.clone().unwrap();
        state.filters_page.criteria.delivery = DeliveryStatus::Delivered;
        state.filters_page.refilter(&ds);

        assert_eq!(state.filters_view().unwrap().len(), 1);
        assert_eq!(state.summary_view().unwrap().len(), 2);
    }

    #[test]
    fn test_changed_file_reloads_and_resets_filters() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_sheet(&dir);
        log_in(&mut state);
        state.filters_page.criteria.delivery = DeliveryStatus::Delivered;

        let path = state.config.data_path.clone();
        let grown = format!("{SHEET}2024-07-15,Areial,ABC1234,Obra Norte,2024-07-16,10,1200\n");
        std::fs::write(&path, grown).unwrap();
        // Coarse filesystem clocks may not tick between the two writes.
        let later = SystemTime::now() + Duration::from_secs(5);
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(later).unwrap();

        state.navigate(Page::Database);

        let new_end = NaiveDate::from_ymd_opt(2024, 7, 15);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(4));
        assert_eq!(state.filters_page.criteria.date_range.map(|r| r.end), new_end);
        assert_eq!(state.summary_page.criteria.date_range.map(|r| r.end), new_end);
        assert_eq!(state.filters_page.criteria.delivery, DeliveryStatus::Any);
        assert_eq!(state.filters_page.visible_indices, vec![0, 1, 3]);
    }

    #[test]
    fn test_unchanged_file_keeps_filters() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_sheet(&dir);
        log_in(&mut state);
        state.filters_page.criteria.delivery = DeliveryStatus::Delivered;

        state.navigate(Page::Database);
        state.navigate(Page::Filters);

        assert_eq!(state.filters_page.criteria.delivery, DeliveryStatus::Delivered);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(3));
    }

    #[test]
    fn test_missing_file_reports_error() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_path: dir.path().join("dadss.xlsx"),
            ..AppConfig::default()
        };
        let mut state = AppState::new(config);
        log_in(&mut state);

        assert!(state.session.is_authenticated());
        assert!(state.dataset.is_none());
        assert!(matches!(state.status_message, Some(Status::Error(_))));
    }

    #[test]
    fn test_logout_returns_to_login() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with_sheet(&dir);
        log_in(&mut state);
        state.navigate(Page::Summary);
        state.logout();

        assert!(!state.session.is_authenticated());
        assert_eq!(state.page, Page::Home);
    }
}
