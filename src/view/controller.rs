use std::collections::VecDeque;

use crate::view::format::{ResultCard, StatusEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Search,
    Status,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Upload, Tab::Search, Tab::Status];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Upload => "Upload",
            Tab::Search => "Search",
            Tab::Status => "Check Status",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Upload => 0,
            Tab::Search => 1,
            Tab::Status => 2,
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which surface is visible. Only the auth form while logged out; exactly one
/// functional tab while logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Unauthenticated,
    Authenticated(Tab),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Converting,
    Uploading,
}

impl UploadStage {
    pub fn label(self) -> &'static str {
        match self {
            UploadStage::Converting => "Converting file...",
            UploadStage::Uploading => "Uploading to API...",
        }
    }

    pub fn percent(self) -> u16 {
        match self {
            UploadStage::Converting => 30,
            UploadStage::Uploading => 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Success { document_id: String, filename: String },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchPanel {
    #[default]
    Idle,
    Searching,
    Empty,
    Results(Vec<ResultCard>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatusPanel {
    #[default]
    Idle,
    Checking,
    Empty,
    History {
        current: StatusEntry,
        timeline: Vec<StatusEntry>,
    },
    Failed(String),
}

type ProgressHook = Box<dyn Fn(Option<UploadStage>) + Send>;

/// Everything currently shown to the user. Operations write here; the CLI
/// printer and the TUI read from here.
pub struct ViewController {
    screen: Screen,
    pub auth_notice: Option<Notice>,
    progress: Option<UploadStage>,
    on_progress: Option<ProgressHook>,
    pub upload_result: Option<UploadResult>,
    pub search: SearchPanel,
    pub status: StatusPanel,
    pub status_input: String,
    alerts: VecDeque<String>,
    pub opened_url: Option<String>,
}

impl ViewController {
    pub fn new(authenticated: bool) -> Self {
        Self {
            screen: if authenticated {
                Screen::Authenticated(Tab::Upload)
            } else {
                Screen::Unauthenticated
            },
            auth_notice: None,
            progress: None,
            on_progress: None,
            upload_result: None,
            search: SearchPanel::Idle,
            status: StatusPanel::Idle,
            status_input: String::new(),
            alerts: VecDeque::new(),
            opened_url: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.screen, Screen::Authenticated(_))
    }

    pub fn active_tab(&self) -> Option<Tab> {
        match self.screen {
            Screen::Authenticated(tab) => Some(tab),
            Screen::Unauthenticated => None,
        }
    }

    /// Switch the functional tab. Ignored while logged out.
    pub fn show_tab(&mut self, tab: Tab) {
        if self.is_authenticated() {
            self.screen = Screen::Authenticated(tab);
        }
    }

    pub fn enter_authenticated(&mut self) {
        if !self.is_authenticated() {
            self.screen = Screen::Authenticated(Tab::Upload);
        }
    }

    /// Back to the auth surface. Panels from the previous session are dropped.
    pub fn enter_unauthenticated(&mut self) {
        self.screen = Screen::Unauthenticated;
        self.set_progress(None);
        self.upload_result = None;
        self.search = SearchPanel::Idle;
        self.status = StatusPanel::Idle;
        self.status_input.clear();
        self.opened_url = None;
    }

    pub fn require_login(&mut self) {
        self.enter_unauthenticated();
        self.auth_notice = Some(Notice::Error("Please log in first".to_string()));
    }

    pub fn progress(&self) -> Option<UploadStage> {
        self.progress
    }

    pub fn set_progress(&mut self, stage: Option<UploadStage>) {
        self.progress = stage;
        if let Some(hook) = &self.on_progress {
            hook(stage);
        }
    }

    pub fn on_progress(&mut self, hook: impl Fn(Option<UploadStage>) + Send + 'static) {
        self.on_progress = Some(Box::new(hook));
    }

    /// Queue a message that must be acknowledged before anything else.
    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "alert");
        self.alerts.push_back(message);
    }

    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alerts.pop_front()
    }

    pub fn drain_alerts(&mut self) -> Vec<String> {
        self.alerts.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_initial_screen_follows_session() {
        assert_eq!(ViewController::new(false).screen(), Screen::Unauthenticated);
        assert_eq!(
            ViewController::new(true).screen(),
            Screen::Authenticated(Tab::Upload)
        );
    }

    #[test]
    fn test_tabs_ignored_while_logged_out() {
        let mut view = ViewController::new(false);
        view.show_tab(Tab::Search);
        assert_eq!(view.active_tab(), None);
    }

    #[test]
    fn test_exactly_one_tab_active() {
        let mut view = ViewController::new(true);
        view.show_tab(Tab::Status);
        assert_eq!(view.active_tab(), Some(Tab::Status));
        view.show_tab(Tab::Search);
        assert_eq!(view.active_tab(), Some(Tab::Search));
    }

    #[test]
    fn test_tab_cycling_wraps() {
        assert_eq!(Tab::Status.next(), Tab::Upload);
        assert_eq!(Tab::Upload.prev(), Tab::Status);
        assert_eq!(Tab::Upload.next(), Tab::Search);
    }

    #[test]
    fn test_require_login_resets_panels() {
        let mut view = ViewController::new(true);
        view.status_input = "doc-1".to_string();
        view.search = SearchPanel::Empty;
        view.require_login();
        assert_eq!(view.screen(), Screen::Unauthenticated);
        assert!(view.status_input.is_empty());
        assert_eq!(view.search, SearchPanel::Idle);
        assert_eq!(
            view.auth_notice,
            Some(Notice::Error("Please log in first".to_string()))
        );
    }

    #[test]
    fn test_progress_hook_sees_every_stage() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut view = ViewController::new(true);
        view.on_progress(move |stage| sink.lock().unwrap().push(stage));

        view.set_progress(Some(UploadStage::Converting));
        view.set_progress(Some(UploadStage::Uploading));
        view.set_progress(None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some(UploadStage::Converting), Some(UploadStage::Uploading), None]
        );
        assert_eq!(UploadStage::Converting.percent(), 30);
        assert_eq!(UploadStage::Uploading.percent(), 80);
    }

    #[test]
    fn test_alerts_are_fifo() {
        let mut view = ViewController::new(true);
        view.alert("first");
        view.alert("second");
        assert_eq!(view.current_alert(), Some("first"));
        assert_eq!(view.dismiss_alert().as_deref(), Some("first"));
        assert_eq!(view.drain_alerts(), vec!["second".to_string()]);
        assert_eq!(view.current_alert(), None);
    }
}
