// 🧾 Kanzlei screens - client list, client detail, matching, inbox

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use belegzuordnung::format;
use belegzuordnung::pages::{ClientDetailPage, ClientListPage, InboxPage, MatchingPage, Page};
use belegzuordnung::routes::Route;
use belegzuordnung::{ClientStatus, MatchStatus, Transaction};

use super::{header_row, highlight_style, hint, label, panel, section, App, InputMode};

fn status_color(status: ClientStatus) -> Color {
    match status {
        ClientStatus::OnTrack => Color::Green,
        ClientStatus::AtRisk => Color::Red,
    }
}

fn match_color(status: MatchStatus) -> Color {
    match status {
        MatchStatus::Unmatched => Color::Red,
        MatchStatus::Suggestion => Color::Yellow,
        MatchStatus::Matched => Color::Green,
        MatchStatus::Waiting => Color::Blue,
    }
}

fn alert_style(alert: bool) -> Style {
    if alert {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

// ============================================================================
// KEYS
// ============================================================================

pub(super) fn key_hints(page: &Page) -> Vec<(&'static str, &'static str)> {
    match page {
        Page::ClientList(_) => vec![
            ("Enter", "Open"),
            ("s", "Status"),
            ("v", "Cadence"),
            ("o", "Sort"),
        ],
        Page::ClientDetail(_) => vec![("p", "Period"), ("m", "Matching")],
        Page::Matching(_) => vec![
            ("Enter", "Details"),
            ("Space", "Select"),
            ("a", "All"),
            ("f", "Filter"),
            ("c", "Confirm"),
            ("e", "Receipt"),
            ("b", "Cash"),
            ("n", "Not relevant"),
            ("R", "Request"),
        ],
        Page::Inbox(_) => vec![
            ("Enter", "Matching"),
            ("l", "Client"),
            ("f", "Status"),
            ("d", "Range"),
        ],
        _ => Vec::new(),
    }
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) {
    let selected = app.table.selected();
    let mut target: Option<Route> = None;
    let mut dialog: Option<InputMode> = None;

    match &mut app.page {
        Page::ClientList(page) => match key.code {
            KeyCode::Char('s') => page.cycle_status(),
            KeyCode::Char('v') => page.cycle_cadence(),
            KeyCode::Char('o') => page.cycle_sort(),
            KeyCode::Enter => {
                let id = selected.and_then(|i| page.visible().get(i).map(|c| c.id.clone()));
                target = id.and_then(|id| page.open_client(&id).ok());
            }
            _ => {}
        },
        Page::ClientDetail(page) => match key.code {
            KeyCode::Char('p') => page.cycle_period(),
            KeyCode::Char('m') | KeyCode::Enter => target = Some(page.matching_route()),
            _ => {}
        },
        Page::Matching(page) => {
            let row_id = selected.and_then(|i| page.visible().get(i).map(|t| t.id.clone()));
            match key.code {
                KeyCode::Enter => {
                    if let Some(id) = row_id {
                        app.show_detail = warn_failed("select", page.select_transaction(&id));
                    }
                }
                KeyCode::Char(' ') => {
                    if let Some(id) = row_id {
                        page.toggle_row(&id);
                    }
                }
                KeyCode::Char('a') => page.toggle_all_visible(),
                KeyCode::Char('x') => page.clear_selection(),
                KeyCode::Char('f') => page.cycle_status_filter(),
                KeyCode::Char('c') => {
                    match page.confirm_match() {
                        Ok(true) => {}
                        Ok(false) => tracing::debug!("No suggestion to confirm"),
                        Err(e) => tracing::warn!(action = "confirm", error = %e, "Matching action failed"),
                    }
                }
                KeyCode::Char('e') => {
                    if let Some(next) = next_receipt(page.selected()) {
                        warn_failed("change_receipt", page.choose_receipt(&next));
                    }
                }
                KeyCode::Char('b') => {
                    warn_failed("cash_payment", page.mark_cash_payment());
                }
                KeyCode::Char('n') => {
                    warn_failed("not_relevant", page.mark_not_relevant());
                }
                KeyCode::Char('R') => {
                    if page.open_request_dialog() {
                        dialog = Some(InputMode::RequestNote);
                    }
                }
                KeyCode::Backspace => target = Some(page.back_route()),
                _ => {}
            }
        }
        Page::Inbox(page) => match key.code {
            KeyCode::Char('l') => page.cycle_client(),
            KeyCode::Char('f') => page.cycle_status(),
            KeyCode::Char('d') => page.cycle_date_range(),
            KeyCode::Enter => {
                let id = selected.and_then(|i| page.visible().get(i).map(|item| item.id.clone()));
                target = id.and_then(|id| page.open_matching(&id).ok());
            }
            _ => {}
        },
        _ => {}
    }

    if let Some(route) = target {
        app.navigate(route);
        return;
    }
    if let Some(mode) = dialog {
        app.start_input(mode);
    }
    app.clamp_selection();
    app.refresh_notice();
}

/// Log a failed matching action; the page stays as it was
fn warn_failed(action: &str, result: belegzuordnung::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(action, error = %e, "Matching action failed");
            false
        }
    }
}

/// Next available receipt after the current suggestion, wrapping around
fn next_receipt(tx: Option<&Transaction>) -> Option<String> {
    let tx = tx?;
    if tx.available_receipts.is_empty() {
        return None;
    }
    let current = tx
        .suggested_receipt
        .as_ref()
        .and_then(|s| tx.available_receipts.iter().position(|r| r.id == s.id));
    let next = match current {
        Some(i) => (i + 1) % tx.available_receipts.len(),
        None => 0,
    };
    Some(tx.available_receipts[next].id.clone())
}

pub(super) fn submit_input(app: &mut App, mode: InputMode, value: &str) {
    if let (InputMode::RequestNote, Page::Matching(page)) = (mode, &mut app.page) {
        page.set_request_note(value);
        page.confirm_request_dialog(Utc::now());
    }
    app.clamp_selection();
    app.refresh_notice();
}

pub(super) fn cancel_dialog(app: &mut App) {
    if let Page::Matching(page) = &mut app.page {
        page.cancel_request_dialog();
    }
}

// ============================================================================
// CLIENT LIST
// ============================================================================

pub(super) fn render_client_list(
    f: &mut Frame,
    area: Rect,
    page: &ClientListPage,
    table: &mut TableState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary = page.summary();
    let kpis = Paragraph::new(Line::from(vec![
        label("Clients"),
        Span::raw(summary.clients.to_string()),
        label("At risk"),
        Span::styled(summary.at_risk.to_string(), Style::default().fg(Color::Red)),
        label("Unmatched transactions"),
        Span::raw(format::plain_number(summary.unmatched_transactions as f64)),
        label("Unmatched receipts"),
        Span::raw(format::plain_number(summary.unmatched_receipts as f64)),
    ]))
    .block(panel("Overview", Color::Cyan));
    f.render_widget(kpis, chunks[0]);

    let rows: Vec<Row> = page
        .visible()
        .into_iter()
        .map(|client| {
            let status = client.status();
            Row::new(vec![
                Cell::from(format::truncate(&client.name, 32)),
                Cell::from(client.vat_cadence.label()),
                Cell::from(client.bank_transactions.to_string()),
                Cell::from(client.unmatched_bank_transactions.to_string())
                    .style(alert_style(client.transactions_alert())),
                Cell::from(client.unmatched_receipts.to_string())
                    .style(alert_style(client.receipts_alert())),
                Cell::from(format!("{}%", client.receipt_completeness)),
                Cell::from(client.current_vat_period.label.clone()),
                Cell::from(status.label()).style(Style::default().fg(status_color(status))),
            ])
        })
        .collect();

    let filter = &page.filter;
    let title = format!(
        " Clients · Status: {} · Cadence: {} · Sort: {}{} ",
        filter.status.map(|s| s.label()).unwrap_or("All"),
        filter.cadence.map(|c| c.label()).unwrap_or("All"),
        page.sort.label(),
        if filter.search.is_empty() {
            String::new()
        } else {
            format!(" · Search: \"{}\"", filter.search)
        }
    );

    let widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(9),
    ];
    let table_widget = Table::new(rows, widths)
        .header(header_row(&[
            "Client",
            "Cadence",
            "Bank tx",
            "Open tx",
            "Open rcpt",
            "Compl.",
            "VAT period",
            "Status",
        ]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");

    f.render_stateful_widget(table_widget, chunks[1], table);
}

// ============================================================================
// CLIENT DETAIL
// ============================================================================

pub(super) fn render_client_detail(f: &mut Frame, area: Rect, page: &ClientDetailPage) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let client = page.client();
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {}", client.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ·  {}  ·  {}", client.vat_cadence.label(), page.period().label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(panel("Client", Color::Cyan));
    f.render_widget(title, chunks[0]);

    let kpis = page.kpis();
    let kpi_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[1]);

    let kpi = |title: &str, value: String, color: Color| {
        Paragraph::new(Span::styled(
            format!("  {}", value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .block(panel(title, Color::DarkGray))
    };
    f.render_widget(
        kpi("Bank transactions", kpis.bank_transactions.to_string(), Color::White),
        kpi_chunks[0],
    );
    f.render_widget(
        kpi(
            "Unmatched transactions",
            format!("{} ({})", kpis.unmatched_transactions, kpis.unmatched_level.label()),
            Color::Red,
        ),
        kpi_chunks[1],
    );
    f.render_widget(
        kpi("Unmatched receipts", kpis.unmatched_receipts.to_string(), Color::Yellow),
        kpi_chunks[2],
    );
    let gauge = Gauge::default()
        .block(panel("Receipt completeness", Color::DarkGray))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(kpis.receipt_completeness.min(100) as u16)
        .label(format!("{}%", kpis.receipt_completeness));
    f.render_widget(gauge, kpi_chunks[3]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let work = vec![
        Line::from(""),
        section("Open work"),
        Line::from(""),
        Line::from(vec![
            label("Unmatched transactions"),
            Span::styled(
                client.unmatched_bank_transactions.to_string(),
                alert_style(client.transactions_alert()),
            ),
        ]),
        Line::from(vec![
            label("Unmatched receipts"),
            Span::styled(
                client.unmatched_receipts.to_string(),
                alert_style(client.receipts_alert()),
            ),
        ]),
        Line::from(""),
        hint("m  Go to matching"),
        hint("p  Switch reporting period"),
    ];
    f.render_widget(
        Paragraph::new(work).block(panel("Work", Color::Yellow)),
        body[0],
    );

    let overview = page.overview();
    let risk = vec![
        Line::from(""),
        section("Risk & reminders"),
        Line::from(""),
        Line::from(vec![
            label("Status"),
            Span::styled(
                overview.status_label.clone(),
                Style::default()
                    .fg(status_color(overview.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![label("VAT deadline"), Span::raw(overview.vat_deadline.clone())]),
        Line::from(vec![
            label("Current period"),
            Span::raw(overview.current_period.summary()),
        ]),
        Line::from(vec![
            label("Next period"),
            Span::raw(overview.next_period.summary()),
        ]),
        Line::from(vec![
            label("Reminders this period"),
            Span::raw(overview.reminders_this_period.to_string()),
        ]),
    ];
    f.render_widget(
        Paragraph::new(risk)
            .wrap(Wrap { trim: false })
            .block(panel("Risk", Color::Yellow)),
        body[1],
    );
}

// ============================================================================
// MATCHING
// ============================================================================

pub(super) fn render_matching(
    f: &mut Frame,
    area: Rect,
    page: &MatchingPage,
    table: &mut TableState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let selection = page.selection();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {}", page.client().name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ·  {}", page.progress_label()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("  ·  {} waiting", page.waiting_count()),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("  ·  {} selected", selection.len()),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .block(panel("Matching", Color::Cyan));
    f.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[1]);

    let rows: Vec<Row> = page
        .visible()
        .into_iter()
        .map(|tx| {
            let mark = if selection.contains(&tx.id) { "[x]" } else { "[ ]" };
            Row::new(vec![
                Cell::from(mark),
                Cell::from(format::date_de(tx.date)),
                Cell::from(format::truncate(&tx.description, 30)),
                Cell::from(tx.amount_text()),
                Cell::from(tx.status.label()).style(Style::default().fg(match_color(tx.status))),
            ])
        })
        .collect();

    let filter = &page.filter;
    let all_mark = if page.all_visible_selected() { "[x]" } else { "[ ]" };
    let title = format!(
        " Transactions · {}{} ",
        filter.status.map(|s| s.label()).unwrap_or("All"),
        if filter.search.is_empty() {
            String::new()
        } else {
            format!(" · Search: \"{}\"", filter.search)
        }
    );

    let widths = [
        Constraint::Length(3),
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(18),
    ];
    let table_widget = Table::new(rows, widths)
        .header(header_row(&[all_mark, "Date", "Description", "Amount", "Status"]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");
    f.render_stateful_widget(table_widget, body[0], table);

    render_transaction_detail(f, body[1], page);
}

fn render_transaction_detail(f: &mut Frame, area: Rect, page: &MatchingPage) {
    let tx = match page.selected() {
        Some(tx) => tx,
        None => {
            let empty = Paragraph::new(hint("Select a transaction with Enter"))
                .block(panel("Details", Color::Yellow));
            f.render_widget(empty, area);
            return;
        }
    };

    let width = area.width.saturating_sub(6) as usize;
    let mut content = vec![
        Line::from(""),
        Line::from(vec![label("Date"), Span::raw(format::date_de(tx.date))]),
        Line::from(vec![label("Description"), Span::raw(tx.description.clone())]),
        Line::from(vec![
            label("Amount"),
            Span::styled(
                tx.amount_text(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Status"),
            Span::styled(tx.status.label(), Style::default().fg(match_color(tx.status))),
        ]),
    ];

    if let Some(resolution) = &tx.resolution {
        content.push(Line::from(vec![
            label("Resolution"),
            Span::raw(resolution.label()),
        ]));
    }

    if let Some(receipt) = &tx.suggested_receipt {
        content.push(Line::from(""));
        content.push(section("Suggested receipt"));
        content.push(Line::from(vec![label("Supplier"), Span::raw(receipt.supplier.clone())]));
        content.push(Line::from(vec![label("Date"), Span::raw(format::date_de(receipt.date))]));
        content.push(Line::from(vec![
            label("Amount"),
            Span::raw(format::euro_de(receipt.amount)),
            Span::styled(
                format!("  (VAT {})", format::euro_de(receipt.vat)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for line in format::wrap_text(&receipt.description, width) {
            content.push(Line::from(format!("  {}", line)));
        }
    }

    if !tx.available_receipts.is_empty() {
        content.push(Line::from(""));
        content.push(section("Available receipts"));
        for receipt in &tx.available_receipts {
            let current = tx
                .suggested_receipt
                .as_ref()
                .map(|s| s.id == receipt.id)
                .unwrap_or(false);
            let marker = if current { "● " } else { "○ " };
            content.push(Line::from(format!(
                "  {}{} · {} · {}",
                marker,
                receipt.supplier,
                format::date_de(receipt.date),
                format::euro_de(receipt.amount)
            )));
        }
    }

    if let Some(request) = &tx.request {
        content.push(Line::from(""));
        content.push(section("Request to client"));
        for line in request.message.lines() {
            for wrapped in format::wrap_text(line, width) {
                content.push(Line::from(format!("  {}", wrapped)));
            }
        }
    }

    if let Some(dialog) = page.request_dialog() {
        content.push(Line::from(""));
        content.push(section("Request receipts"));
        content.push(Line::from(format!(
            "  {} transactions · note: {}",
            page.selection().len(),
            dialog.note
        )));
    }

    content.push(Line::from(""));
    content.push(hint("c confirm · e other receipt · b cash · n not relevant"));

    let detail = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(panel("Details", Color::Yellow));
    f.render_widget(detail, area);
}

// ============================================================================
// INBOX
// ============================================================================

pub(super) fn render_inbox(f: &mut Frame, area: Rect, page: &InboxPage, table: &mut TableState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let kpis = page.kpis();
    let overview = Paragraph::new(Line::from(vec![
        label("Total open"),
        Span::raw(kpis.total_open.to_string()),
        label("Unmatched"),
        Span::styled(kpis.unmatched.to_string(), Style::default().fg(Color::Red)),
        label("Waiting for client"),
        Span::styled(kpis.waiting.to_string(), Style::default().fg(Color::Blue)),
    ]))
    .block(panel("Inbox", Color::Cyan));
    f.render_widget(overview, chunks[0]);

    let filter = &page.filter;
    let title = format!(
        " {} · {} · {}{} ",
        page.client_filter_label(),
        filter.status.map(|s| s.label()).unwrap_or("All statuses"),
        filter.date_range.label(),
        if filter.search.is_empty() {
            String::new()
        } else {
            format!(" · Search: \"{}\"", filter.search)
        }
    );

    if let Some(message) = page.empty_message() {
        let empty = Paragraph::new(vec![Line::from(""), hint(message)])
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, chunks[1]);
        return;
    }

    let rows: Vec<Row> = page
        .visible()
        .into_iter()
        .map(|item| {
            Row::new(vec![
                Cell::from(format::truncate(&item.client_name, 26)),
                Cell::from(format::date_de(item.date)),
                Cell::from(format::truncate(&item.description, 32)),
                Cell::from(format::euro_de(item.amount)),
                Cell::from(item.status.label()).style(Style::default().fg(match_color(item.status))),
                Cell::from(item.age_label()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(26),
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Length(13),
    ];
    let table_widget = Table::new(rows, widths)
        .header(header_row(&["Client", "Date", "Description", "Amount", "Status", "Age"]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");
    f.render_stateful_widget(table_widget, chunks[1], table);
}
