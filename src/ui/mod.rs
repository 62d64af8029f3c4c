use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Cell, Clear, Paragraph, Row, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;
use tui_input::{Input, InputRequest};

use belegzuordnung::activity::{Notice, NoticeLevel};
use belegzuordnung::pages::{Page, PageContext};
use belegzuordnung::role::RoleContext;
use belegzuordnung::routes::Route;
use belegzuordnung::{Settings, APP_TITLE};

mod kanzlei;
mod mandant;

// ============================================================================
// INPUT MODES
// ============================================================================

/// What the text input currently edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    /// Note of the "request receipts" dialog
    RequestNote,
    /// First field of the "+ Beleg" dialog
    UploadFilename,
    /// Second field of the "+ Beleg" dialog
    UploadNote,
    /// Comma-separated file names on the upload page
    UploadFiles,
}

impl InputMode {
    fn title(&self) -> &'static str {
        match self {
            InputMode::Normal => "",
            InputMode::Search => " Search ",
            InputMode::RequestNote => " Request receipts - note to client (optional) ",
            InputMode::UploadFilename => " Beleg hinzufügen - Datei ",
            InputMode::UploadNote => " Hinweis an Ihre Kanzlei (optional) ",
            InputMode::UploadFiles => " Dateien auswählen (kommagetrennt) ",
        }
    }
}

// ============================================================================
// APP
// ============================================================================

/// Back stack depth; the oldest entry is dropped first
const HISTORY_LIMIT: usize = 50;

pub struct App {
    pub settings: Settings,
    pub roles: RoleContext,
    pub route: Route,
    pub page: Page,
    pub table: TableState,
    pub show_detail: bool,
    pub mode: InputMode,
    pub input: Input,
    pub notice: Option<Notice>,
    history: Vec<Route>,
    pub should_quit: bool,
}

impl App {
    pub fn new(settings: Settings, start_path: Option<&str>) -> Self {
        let roles = RoleContext::new(settings.role);
        let path = start_path
            .unwrap_or_else(|| roles.role().start_path())
            .to_string();

        let mut app = Self {
            settings,
            roles,
            route: Route::ClientList,
            page: Page::NotFound {
                path: String::new(),
                message: String::new(),
            },
            table: TableState::default(),
            show_detail: false,
            mode: InputMode::Normal,
            input: Input::default(),
            notice: None,
            history: Vec::new(),
            should_quit: false,
        };
        app.open(&path);
        app
    }

    fn page_context(&self) -> PageContext {
        PageContext {
            user: self.roles.current().clone(),
            reference_date: self.settings.reference_date,
            today: Local::now().date_naive(),
        }
    }

    fn open(&mut self, path: &str) {
        let ctx = self.page_context();
        let (route, page) = Page::open_path(path, &ctx);
        tracing::info!(path, route = %route, "Opened page");

        self.route = route;
        self.page = page;
        self.show_detail = false;
        self.mode = InputMode::Normal;
        self.input.reset();
        self.reset_selection();
    }

    pub fn navigate(&mut self, route: Route) {
        if route != self.route {
            if self.history.len() == HISTORY_LIMIT {
                self.history.remove(0);
            }
            self.history.push(self.route.clone());
        }
        self.open(&route.to_path());
    }

    pub fn go_back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.open(&previous.to_path());
        }
    }

    pub fn switch_persona(&mut self) {
        let start = self.roles.toggle();
        self.history.clear();
        self.open(start);

        let user = self.roles.current();
        self.notice = Some(
            Notice::new(NoticeLevel::Info, "persona_switched", "Ansicht gewechselt", &user.name)
                .with_detail(format!("{} ({})", user.name, user.role_label)),
        );
    }

    fn nav_position(&self) -> Option<usize> {
        self.roles
            .navigation()
            .iter()
            .position(|item| Route::parse(&item.path) == self.route)
    }

    pub fn next_nav(&mut self) {
        let nav = self.roles.navigation();
        if nav.is_empty() {
            return;
        }
        let i = self.nav_position().map(|i| (i + 1) % nav.len()).unwrap_or(0);
        self.navigate(Route::parse(&nav[i].path));
    }

    pub fn previous_nav(&mut self) {
        let nav = self.roles.navigation();
        if nav.is_empty() {
            return;
        }
        let i = match self.nav_position() {
            Some(0) | None => nav.len() - 1,
            Some(i) => i - 1,
        };
        self.navigate(Route::parse(&nav[i].path));
    }

    /// Pick up the latest notice a page action recorded
    pub fn refresh_notice(&mut self) {
        let latest = match &self.page {
            Page::Matching(page) => page.activity().latest(),
            Page::MandantTransactions(page) => page.activity().latest(),
            Page::MandantUpload(page) => page.activity().latest(),
            _ => None,
        };
        if let Some(notice) = latest {
            if self.notice.as_ref().map(|n| &n.id) != Some(&notice.id) {
                self.notice = Some(notice.clone());
            }
        }
    }

    // ========================================================================
    // TABLE NAVIGATION
    // ========================================================================

    pub fn row_count(&self) -> usize {
        match &self.page {
            Page::ClientList(page) => page.visible().len(),
            Page::Inbox(page) => page.visible().len(),
            Page::Matching(page) => page.visible().len(),
            Page::MandantDashboard(page) => page.periods_needing_attention().len(),
            Page::MandantTransactions(page) => page.visible().len(),
            Page::MandantUpload(page) => page.receipts().len(),
            Page::MandantReceipts(page) => page.visible().len(),
            Page::ClientDetail(_) | Page::NotFound { .. } | Page::Denied { .. } => 0,
        }
    }

    fn reset_selection(&mut self) {
        if self.row_count() > 0 {
            self.table.select(Some(0));
        } else {
            self.table.select(None);
        }
    }

    /// Keep the cursor inside the list after a filter change
    pub fn clamp_selection(&mut self) {
        let len = self.row_count();
        match self.table.selected() {
            _ if len == 0 => self.table.select(None),
            Some(i) if i >= len => self.table.select(Some(len - 1)),
            None => self.table.select(Some(0)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) => (i + 10).min(len - 1),
            None => 0,
        };
        self.table.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = self.table.selected().map(|i| i.saturating_sub(10)).unwrap_or(0);
        self.table.select(Some(i));
    }

    // ========================================================================
    // SEARCH & TEXT INPUT
    // ========================================================================

    fn current_search(&self) -> Option<String> {
        match &self.page {
            Page::ClientList(page) => Some(page.filter.search.clone()),
            Page::Inbox(page) => Some(page.filter.search.clone()),
            Page::Matching(page) => Some(page.filter.search.clone()),
            Page::MandantTransactions(page) => Some(page.filter.search.clone()),
            Page::MandantReceipts(page) => Some(page.filter.search.clone()),
            _ => None,
        }
    }

    fn apply_search(&mut self, query: &str) {
        match &mut self.page {
            Page::ClientList(page) => page.set_search(query),
            Page::Inbox(page) => page.set_search(query),
            Page::Matching(page) => page.set_search(query),
            Page::MandantTransactions(page) => page.set_search(query),
            Page::MandantReceipts(page) => page.set_search(query),
            _ => {}
        }
        self.clamp_selection();
    }

    fn start_search(&mut self) {
        if let Some(current) = self.current_search() {
            self.input = Input::default().with_value(current);
            self.mode = InputMode::Search;
        }
    }

    /// Switch the text input to a dialog field
    pub fn start_input(&mut self, mode: InputMode) {
        self.input.reset();
        self.mode = mode;
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let request = match key.code {
            KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
            KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
            KeyCode::Delete => Some(InputRequest::DeleteNextChar),
            KeyCode::Left => Some(InputRequest::GoToPrevChar),
            KeyCode::Right => Some(InputRequest::GoToNextChar),
            KeyCode::Home => Some(InputRequest::GoToStart),
            KeyCode::End => Some(InputRequest::GoToEnd),
            _ => None,
        };

        if let Some(request) = request {
            self.input.handle(request);
            if self.mode == InputMode::Search {
                let query = self.input.value().to_string();
                self.apply_search(&query);
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.mode == InputMode::Search {
                    self.apply_search("");
                } else {
                    kanzlei::cancel_dialog(self);
                    mandant::cancel_dialog(self);
                }
                self.mode = InputMode::Normal;
                self.input.reset();
            }
            KeyCode::Enter => {
                let value = self.input.value().to_string();
                let mode = self.mode;
                self.mode = InputMode::Normal;
                self.input.reset();
                match mode {
                    InputMode::Search | InputMode::Normal => {}
                    InputMode::RequestNote => kanzlei::submit_input(self, mode, &value),
                    InputMode::UploadFilename | InputMode::UploadNote | InputMode::UploadFiles => {
                        mandant::submit_input(self, mode, &value)
                    }
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // KEYS
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.mode != InputMode::Normal {
            self.handle_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Esc => {
                if self.show_detail {
                    self.show_detail = false;
                } else {
                    self.go_back();
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_nav();
                } else {
                    self.next_nav();
                }
            }
            KeyCode::BackTab => self.previous_nav(),
            KeyCode::Char('P') => self.switch_persona(),
            KeyCode::Char('/') => self.start_search(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => self.table.select(Some(0)),
            KeyCode::End => {
                let len = self.row_count();
                if len > 0 {
                    self.table.select(Some(len - 1));
                }
            }
            _ => match self.roles.role() {
                belegzuordnung::UserRole::TaxClerk => kanzlei::handle_key(self, key),
                belegzuordnung::UserRole::Client => mandant::handle_key(self, key),
            },
        }
    }
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "UI loop failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(4), // Status bar + notice
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let show_detail = app.show_detail;
    match &app.page {
        Page::ClientList(page) => kanzlei::render_client_list(f, chunks[1], page, &mut app.table),
        Page::ClientDetail(page) => kanzlei::render_client_detail(f, chunks[1], page),
        Page::Matching(page) => kanzlei::render_matching(f, chunks[1], page, &mut app.table),
        Page::Inbox(page) => kanzlei::render_inbox(f, chunks[1], page, &mut app.table),
        Page::MandantDashboard(page) => {
            mandant::render_dashboard(f, chunks[1], page, &mut app.table)
        }
        Page::MandantTransactions(page) => {
            mandant::render_transactions(f, chunks[1], page, &mut app.table, show_detail)
        }
        Page::MandantUpload(page) => mandant::render_upload(f, chunks[1], page, &mut app.table),
        Page::MandantReceipts(page) => {
            mandant::render_receipts(f, chunks[1], page, &mut app.table)
        }
        Page::NotFound { path, message } => render_not_found(f, chunks[1], path, message),
        Page::Denied { path, role } => render_not_found(
            f,
            chunks[1],
            path,
            &format!("Nicht verfügbar für die Rolle {}", role),
        ),
    }

    render_status_bar(f, chunks[2], app);

    if app.mode != InputMode::Normal {
        render_input_popup(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        format!("{}  ", APP_TITLE),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    for (i, item) in app.roles.navigation().iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if Route::parse(&item.path) == app.route {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(item.title.clone(), style));
    }

    let user = app.roles.current();
    let user_line = Line::from(vec![
        Span::styled(
            format!(" {} ", user.initials()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(user.name.clone(), Style::default().fg(Color::White)),
        Span::styled(
            format!(" · {}", user.role_label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  |  "),
        Span::styled(app.route.title(), Style::default().fg(Color::Green)),
        Span::styled(
            format!("  {}", app.route.to_path()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(vec![Line::from(tab_spans), user_line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.table.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.row_count();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    let page_hints = match app.roles.role() {
        belegzuordnung::UserRole::TaxClerk => kanzlei::key_hints(&app.page),
        belegzuordnung::UserRole::Client => mandant::key_hints(&app.page),
    };
    let common = [
        ("Tab", "Page"),
        ("/", "Search"),
        ("P", "Persona"),
        ("Esc", "Back"),
    ];

    for (key, label) in page_hints.iter().chain(common.iter()) {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", label)));
    }
    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let notice_line = match &app.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Info => Color::Cyan,
                NoticeLevel::Warning => Color::Yellow,
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} ", notice.timestamp.with_timezone(&Local).format("%H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(notice.text(), Style::default().fg(color)),
            ])
        }
        None => Line::from(""),
    };

    let status_bar = Paragraph::new(vec![Line::from(status_spans), notice_line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_not_found(f: &mut Frame, area: Rect, path: &str, message: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", path),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Esc zurück · Tab zur Navigation",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" 404 "),
    );
    f.render_widget(paragraph, area);
}

fn render_input_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 5, f.size());
    f.render_widget(Clear, area);

    let width = area.width.saturating_sub(2) as usize;
    let scroll = app.input.visual_scroll(width);
    let field = Paragraph::new(app.input.value())
        .scroll((0, scroll as u16))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(app.mode.title())
                .title(Title::from(" Enter OK · Esc Abbrechen ").position(Position::Bottom)),
        );
    f.render_widget(field, area);

    f.set_cursor(
        area.x + 1 + (app.input.visual_cursor().saturating_sub(scroll)) as u16,
        area.y + 1,
    );
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Fixed-height rectangle centered horizontally and vertically
pub(crate) fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub(crate) fn header_row<'a>(titles: &[&'a str]) -> Row<'a> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

pub(crate) fn label(text: &str) -> Span<'static> {
    Span::styled(
        format!("  {}: ", text),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

pub(crate) fn section(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

pub(crate) fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}

pub(crate) fn highlight_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn panel(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", title))
}
