use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;

use crate::api::models::SearchQuery;
use crate::ops::{self, AppContext};
use crate::view::controller::{Screen, SearchPanel, StatusPanel, Tab, UploadStage};

use super::{auth, chrome, search, status, upload};

pub const CATEGORIES: [&str; 12] = [
    "", "resume", "report", "article", "invoice", "contract", "letter", "certificate", "legal",
    "presentation", "manual", "form",
];
pub const FILE_TYPES: [&str; 6] = ["", "PDF", "DOCX", "DOC", "TXT", "CSV"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthField {
    Username,
    Password,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchField {
    Query,
    Category,
    Type,
}

/// A user request that needs an operation to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login,
    Register,
    Upload(PathBuf),
    ViewRecent(usize),
    Search,
    CheckStatus,
    Download(String),
    Logout,
}

pub struct App {
    pub ctx: AppContext,
    pub auth_mode: AuthMode,
    pub auth_field: AuthField,
    pub username: String,
    pub password: String,
    pub email: String,
    pub upload_path: String,
    pub recent_selected: usize,
    pub search_input: String,
    pub search_field: SearchField,
    pub category_idx: usize,
    pub type_idx: usize,
    pub search_scroll: usize,
    pub status_scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        let username = ctx.username().unwrap_or_default().to_string();
        Self {
            ctx,
            auth_mode: AuthMode::Login,
            auth_field: AuthField::Username,
            username,
            password: String::new(),
            email: String::new(),
            upload_path: String::new(),
            recent_selected: 0,
            search_input: String::new(),
            search_field: SearchField::Query,
            category_idx: 0,
            type_idx: 0,
            search_scroll: 0,
            status_scroll: 0,
            should_quit: false,
        }
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            text: self.search_input.clone(),
            category: CATEGORIES[self.category_idx].to_string(),
            doc_type: FILE_TYPES[self.type_idx].to_string(),
        }
    }

    /// Apply a key press to the form state. Returns the operation to run, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return None;
        }

        if self.ctx.view.current_alert().is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.ctx.view.dismiss_alert();
            }
            return None;
        }

        match self.ctx.view.screen() {
            Screen::Unauthenticated => self.handle_auth_key(key, ctrl),
            Screen::Authenticated(tab) => {
                match key.code {
                    KeyCode::Char('l') if ctrl => return Some(Action::Logout),
                    KeyCode::Tab => {
                        self.ctx.view.show_tab(tab.next());
                        return None;
                    }
                    KeyCode::BackTab => {
                        self.ctx.view.show_tab(tab.prev());
                        return None;
                    }
                    KeyCode::F(n @ 1..=3) => {
                        self.ctx.view.show_tab(Tab::ALL[n as usize - 1]);
                        return None;
                    }
                    _ => {}
                }
                match tab {
                    Tab::Upload => self.handle_upload_key(key, ctrl),
                    Tab::Search => self.handle_search_key(key, ctrl),
                    Tab::Status => self.handle_status_key(key, ctrl),
                }
            }
        }
    }

    /// A pasted (or drag-and-dropped) path on the Upload tab starts an upload.
    pub fn handle_paste(&mut self, text: &str) -> Option<Action> {
        match self.ctx.view.screen() {
            Screen::Authenticated(Tab::Upload) => {
                let path = dropped_path(text)?;
                self.upload_path.clear();
                Some(Action::Upload(path))
            }
            Screen::Authenticated(Tab::Search) if self.search_field == SearchField::Query => {
                self.search_input.push_str(text.trim());
                None
            }
            Screen::Authenticated(Tab::Status) => {
                self.ctx.view.status_input.push_str(text.trim());
                None
            }
            _ => None,
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent, ctrl: bool) -> Option<Action> {
        match key.code {
            KeyCode::Char('r') if ctrl => {
                self.auth_mode = match self.auth_mode {
                    AuthMode::Login => AuthMode::Register,
                    AuthMode::Register => AuthMode::Login,
                };
                if self.auth_mode == AuthMode::Login && self.auth_field == AuthField::Email {
                    self.auth_field = AuthField::Username;
                }
                self.ctx.view.auth_notice = None;
            }
            KeyCode::Tab | KeyCode::Down => self.auth_field = self.next_auth_field(),
            KeyCode::BackTab | KeyCode::Up => self.auth_field = self.prev_auth_field(),
            KeyCode::Enter => {
                return Some(match self.auth_mode {
                    AuthMode::Login => Action::Login,
                    AuthMode::Register => Action::Register,
                });
            }
            KeyCode::Backspace => {
                self.auth_input().pop();
            }
            KeyCode::Char(c) if !ctrl => self.auth_input().push(c),
            _ => {}
        }
        None
    }

    fn auth_input(&mut self) -> &mut String {
        match self.auth_field {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Email => &mut self.email,
        }
    }

    fn auth_fields(&self) -> &'static [AuthField] {
        match self.auth_mode {
            AuthMode::Login => &[AuthField::Username, AuthField::Password],
            AuthMode::Register => &[AuthField::Username, AuthField::Password, AuthField::Email],
        }
    }

    fn next_auth_field(&self) -> AuthField {
        let fields = self.auth_fields();
        let i = fields.iter().position(|f| *f == self.auth_field).unwrap_or(0);
        fields[(i + 1) % fields.len()]
    }

    fn prev_auth_field(&self) -> AuthField {
        let fields = self.auth_fields();
        let i = fields.iter().position(|f| *f == self.auth_field).unwrap_or(0);
        fields[(i + fields.len() - 1) % fields.len()]
    }

    fn handle_upload_key(&mut self, key: KeyEvent, ctrl: bool) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                if !self.upload_path.trim().is_empty() {
                    let path = dropped_path(&self.upload_path);
                    self.upload_path.clear();
                    return path.map(Action::Upload);
                }
                if self.recent_selected < self.ctx.recent_uploads.len() {
                    return Some(Action::ViewRecent(self.recent_selected));
                }
            }
            KeyCode::Up => {
                self.recent_selected = self.recent_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.recent_selected + 1 < self.ctx.recent_uploads.len() {
                    self.recent_selected += 1;
                }
            }
            KeyCode::Backspace => {
                self.upload_path.pop();
            }
            KeyCode::Char(c) if !ctrl => self.upload_path.push(c),
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent, ctrl: bool) -> Option<Action> {
        match key.code {
            KeyCode::Enter => return Some(Action::Search),
            KeyCode::Down => {
                self.search_field = match self.search_field {
                    SearchField::Query => SearchField::Category,
                    SearchField::Category | SearchField::Type => SearchField::Type,
                };
            }
            KeyCode::Up => {
                self.search_field = match self.search_field {
                    SearchField::Query | SearchField::Category => SearchField::Query,
                    SearchField::Type => SearchField::Category,
                };
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.search_field {
                    SearchField::Category => {
                        self.category_idx = cycle(self.category_idx, CATEGORIES.len(), forward)
                    }
                    SearchField::Type => {
                        self.type_idx = cycle(self.type_idx, FILE_TYPES.len(), forward)
                    }
                    SearchField::Query => {}
                }
            }
            KeyCode::PageDown => self.search_scroll += 1,
            KeyCode::PageUp => self.search_scroll = self.search_scroll.saturating_sub(1),
            KeyCode::Backspace if self.search_field == SearchField::Query => {
                self.search_input.pop();
            }
            KeyCode::Char(c) if !ctrl && self.search_field == SearchField::Query => {
                self.search_input.push(c)
            }
            _ => {}
        }
        None
    }

    fn handle_status_key(&mut self, key: KeyEvent, ctrl: bool) -> Option<Action> {
        match key.code {
            KeyCode::Enter => return Some(Action::CheckStatus),
            KeyCode::Char('d') if ctrl => {
                return Some(Action::Download(self.ctx.view.status_input.clone()));
            }
            KeyCode::PageDown => self.status_scroll += 1,
            KeyCode::PageUp => self.status_scroll = self.status_scroll.saturating_sub(1),
            KeyCode::Backspace => {
                self.ctx.view.status_input.pop();
            }
            KeyCode::Char(c) if !ctrl => self.ctx.view.status_input.push(c),
            _ => {}
        }
        None
    }

    /// Put up the in-flight indicator an action will show, so it can be drawn
    /// before the operation suspends.
    pub fn prepare(&mut self, action: &Action) {
        match action {
            Action::Upload(_) if self.ctx.session.is_some() => {
                self.ctx.view.set_progress(Some(UploadStage::Converting))
            }
            Action::Search if self.ctx.session.is_some() => {
                self.ctx.view.search = SearchPanel::Searching
            }
            Action::CheckStatus
                if self.ctx.session.is_some() && !self.ctx.view.status_input.trim().is_empty() =>
            {
                self.ctx.view.status = StatusPanel::Checking
            }
            Action::ViewRecent(index) if self.ctx.session.is_some() => {
                if let Some(record) = self.ctx.recent_uploads.get(*index) {
                    self.ctx.view.status_input = record.document_id.clone();
                    self.ctx.view.show_tab(Tab::Status);
                    self.ctx.view.status = StatusPanel::Checking;
                }
            }
            _ => {}
        }
    }

    /// Run the operation. Returns true when a login or registration succeeded
    /// and the screen change is still pending.
    pub async fn perform(&mut self, action: Action) -> bool {
        match action {
            Action::Login => ops::auth::authenticate(&mut self.ctx, &self.username, &self.password)
                .await
                .is_ok(),
            Action::Register => ops::auth::create_account(
                &mut self.ctx,
                &self.username,
                &self.password,
                &self.email,
            )
            .await
            .is_ok(),
            Action::Logout => {
                let _ = ops::auth::logout(&mut self.ctx);
                self.password.clear();
                false
            }
            Action::Upload(path) => {
                if ops::upload::upload_file(&mut self.ctx, &path).await.is_ok() {
                    self.recent_selected = 0;
                }
                false
            }
            Action::ViewRecent(index) => {
                self.status_scroll = 0;
                let _ = ops::status::view_recent_upload(&mut self.ctx, index).await;
                false
            }
            Action::Search => {
                self.search_scroll = 0;
                let query = self.search_query();
                let _ = ops::search::search(&mut self.ctx, &query).await;
                false
            }
            Action::CheckStatus => {
                self.status_scroll = 0;
                let _ = ops::status::check_status(&mut self.ctx).await;
                false
            }
            Action::Download(document_id) => {
                let _ = ops::download::download(&mut self.ctx, &document_id).await;
                false
            }
        }
    }

    pub async fn complete_login(&mut self) {
        ops::auth::finish_transition(&mut self.ctx).await;
        self.password.clear();
        self.email.clear();
        self.auth_field = AuthField::Username;
    }
}

fn cycle(idx: usize, len: usize, forward: bool) -> usize {
    if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

/// Terminals paste dropped files as a path, sometimes quoted, shell-escaped or
/// as a `file://` URL.
pub fn dropped_path(text: &str) -> Option<PathBuf> {
    let mut s = text.trim();
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            s = &s[1..s.len() - 1];
        }
    }
    let s = s.strip_prefix("file://").unwrap_or(s);
    let unescaped = s.replace("\\ ", " ");
    if unescaped.is_empty() {
        None
    } else {
        Some(PathBuf::from(unescaped))
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    chrome::render_header(frame, chunks[0], app);
    match app.ctx.view.screen() {
        Screen::Unauthenticated => auth::render(frame, chunks[1], app),
        Screen::Authenticated(Tab::Upload) => upload::render(frame, chunks[1], app),
        Screen::Authenticated(Tab::Search) => search::render(frame, chunks[1], app),
        Screen::Authenticated(Tab::Status) => status::render(frame, chunks[1], app),
    }
    chrome::render_help(frame, chunks[2], app);

    if let Some(alert) = app.ctx.view.current_alert() {
        chrome::render_alert(frame, area, alert);
    }
}

pub async fn run_tui(ctx: AppContext) -> Result<()> {
    let mut app = App::new(ctx);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = event_loop(&mut terminal, &mut app).await;

    stdout().execute(DisableBracketedPaste)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Paste(text) => app.handle_paste(&text),
            _ => None,
        };
        if app.should_quit {
            break;
        }

        if let Some(action) = action {
            app.prepare(&action);
            terminal.draw(|frame| render(frame, app))?;
            if app.perform(action).await {
                terminal.draw(|frame| render(frame, app))?;
                app.complete_login().await;
            }
        }
    }
    Ok(())
}
