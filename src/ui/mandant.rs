// 🏠 Mandantenportal screens - dashboard, Konto-Vorgänge, Beleg-Upload, Belege

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use belegzuordnung::entities::{PeriodHealth, ReceiptReviewState};
use belegzuordnung::format;
use belegzuordnung::pages::{
    MandantDashboardPage, MandantReceiptsPage, MandantTransactionsPage, MandantUploadPage, Page,
};
use belegzuordnung::routes::Route;
use belegzuordnung::{MandantReceipt, MandantStatus, ReceiptStatus};

use super::{header_row, highlight_style, hint, label, panel, section, App, InputMode};

fn mandant_color(status: MandantStatus) -> Color {
    match status {
        MandantStatus::Offen => Color::Red,
        MandantStatus::Eingereicht => Color::Yellow,
        MandantStatus::Erledigt => Color::Green,
    }
}

fn receipt_color(status: ReceiptStatus) -> Color {
    match status {
        ReceiptStatus::Neu => Color::Blue,
        ReceiptStatus::Vorgeschlagen => Color::Yellow,
        ReceiptStatus::Zugeordnet => Color::Green,
        ReceiptStatus::Verarbeitet => Color::DarkGray,
    }
}

fn health_color(health: PeriodHealth) -> Color {
    match health {
        PeriodHealth::ImPlan => Color::Green,
        PeriodHealth::Kritisch => Color::Red,
    }
}

// ============================================================================
// KEYS
// ============================================================================

pub(super) fn key_hints(page: &Page) -> Vec<(&'static str, &'static str)> {
    match page {
        Page::MandantDashboard(_) => vec![("Enter", "Periode"), ("c", "Aktueller Monat")],
        Page::MandantTransactions(_) => vec![
            ("Enter", "Details"),
            ("f", "Status"),
            ("u", "+ Beleg"),
            ("w", "Wiederkehrend"),
            ("n", "Kanzlei informieren"),
            ("x", "Filter entfernen"),
        ],
        Page::MandantUpload(_) => vec![
            ("u", "Dateien auswählen"),
            ("Enter", "Details"),
            ("t", "Konto-Vorgänge"),
        ],
        Page::MandantReceipts(_) => vec![
            ("Enter", "Details"),
            ("f", "Filter"),
            ("t", "Vorgang öffnen"),
        ],
        _ => Vec::new(),
    }
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) {
    let selected = app.table.selected();
    let mut target: Option<Route> = None;
    let mut dialog: Option<InputMode> = None;

    match &mut app.page {
        Page::MandantDashboard(page) => match key.code {
            KeyCode::Enter => target = selected.and_then(|i| page.open_period(i)),
            KeyCode::Char('c') => target = Some(page.open_current_period()),
            _ => {}
        },
        Page::MandantTransactions(page) => {
            let row_id = selected.and_then(|i| page.visible().get(i).map(|t| t.id.clone()));
            match key.code {
                KeyCode::Enter => app.show_detail = !app.show_detail,
                KeyCode::Char('f') => page.cycle_status(),
                KeyCode::Char('x') => page.remove_period_filter(),
                KeyCode::Char('u') => {
                    if let Some(id) = row_id {
                        if let Ok(true) = page.open_upload_dialog(&id) {
                            dialog = Some(InputMode::UploadFilename);
                        }
                    }
                }
                KeyCode::Char('w') => {
                    if let Some(id) = row_id {
                        let _ = page.toggle_recurring(&id);
                    }
                }
                KeyCode::Char('n') => {
                    if let Some(id) = row_id {
                        let _ = page.toggle_notify_advisor(&id);
                    }
                }
                _ => {}
            }
        }
        Page::MandantUpload(page) => match key.code {
            KeyCode::Char('u') => dialog = Some(InputMode::UploadFiles),
            KeyCode::Enter => {
                if page.details().is_some() {
                    page.close_details();
                } else if let Some(id) =
                    selected.and_then(|i| page.receipts().get(i).map(|r| r.id.clone()))
                {
                    let _ = page.open_details(&id);
                }
            }
            KeyCode::Char('t') => target = Some(page.transactions_route()),
            _ => {}
        },
        Page::MandantReceipts(page) => match key.code {
            KeyCode::Char('f') => page.cycle_status(),
            KeyCode::Enter => {
                if page.details().is_some() {
                    page.close_details();
                } else if let Some(id) =
                    selected.and_then(|i| page.visible().get(i).map(|r| r.id.clone()))
                {
                    let _ = page.open_details(&id);
                }
            }
            KeyCode::Char('t') => target = page.open_linked_transaction(),
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

pub(super) fn submit_input(app: &mut App, mode: InputMode, value: &str) {
    let mut next: Option<InputMode> = None;

    match (mode, &mut app.page) {
        (InputMode::UploadFilename, Page::MandantTransactions(page)) => {
            page.set_upload_filename(value);
            next = Some(InputMode::UploadNote);
        }
        (InputMode::UploadNote, Page::MandantTransactions(page)) => {
            page.set_upload_note(value);
            if let Err(e) = page.confirm_upload() {
                tracing::warn!(error = %e, "Upload failed");
            }
        }
        (InputMode::UploadFiles, Page::MandantUpload(page)) => {
            let outcome = page.upload_files(value.split(','), Local::now().naive_local());
            tracing::info!(
                added = outcome.added.len(),
                skipped = outcome.skipped.len(),
                "Files uploaded"
            );
        }
        _ => {}
    }

    if let Some(mode) = next {
        app.start_input(mode);
    }
    app.clamp_selection();
    app.refresh_notice();
}

pub(super) fn cancel_dialog(app: &mut App) {
    if let Page::MandantTransactions(page) = &mut app.page {
        page.cancel_upload();
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

pub(super) fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    page: &MandantDashboardPage,
    table: &mut TableState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("  {}", page.welcome()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}  ·  {}", page.subtitle(), page.today_label()),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(panel("Übersicht", Color::Cyan));
    f.render_widget(welcome, chunks[0]);

    let current = page.current_period();
    let current_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let mut info = vec![
        Line::from(vec![
            Span::styled(
                format!("  {}", current.title()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", current.status.label()),
                Style::default().fg(health_color(current.status)),
            ),
        ]),
        Line::from(vec![label("Fehlend"), Span::raw(current.missing_label())]),
    ];
    if let Some(due) = page.due_label() {
        info.push(Line::from(vec![label("Frist"), Span::raw(due)]));
    }
    info.push(hint("c  Vorgänge dieses Monats öffnen"));
    f.render_widget(
        Paragraph::new(info).block(panel("Aktueller Monat", Color::Yellow)),
        current_chunks[0],
    );

    let gauge = Gauge::default()
        .block(panel("Vollständigkeit", Color::Yellow))
        .gauge_style(Style::default().fg(health_color(current.status)))
        .percent(current.completeness.min(100) as u16)
        .label(format!("{}%", current.completeness));
    f.render_widget(gauge, current_chunks[1]);

    let rows: Vec<Row> = page
        .periods_needing_attention()
        .iter()
        .map(|period| {
            Row::new(vec![
                Cell::from(period.title()),
                Cell::from(period.missing_label()),
                Cell::from(format!("{}%", period.completeness)),
                Cell::from(period.status.label())
                    .style(Style::default().fg(health_color(period.status))),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(10),
    ];
    let periods = Table::new(rows, widths)
        .header(header_row(&["Periode", "Belege", "Vollständigkeit", "Status"]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Perioden mit Handlungsbedarf "),
        )
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");
    f.render_stateful_widget(periods, chunks[2], table);

    let messages: Vec<Line> = page
        .messages()
        .iter()
        .map(|message| {
            Line::from(vec![
                Span::styled(
                    format!("  {} ", format::date_de(message.date)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("[{}] ", message.kind.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!("{}: ", message.from), Style::default().fg(Color::White)),
                Span::raw(message.text.clone()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(messages)
            .wrap(Wrap { trim: false })
            .block(panel("Nachrichten", Color::DarkGray)),
        chunks[3],
    );
}

// ============================================================================
// KONTO-VORGÄNGE
// ============================================================================

pub(super) fn render_transactions(
    f: &mut Frame,
    area: Rect,
    page: &MandantTransactionsPage,
    table: &mut TableState,
    show_detail: bool,
) {
    let chunks = if show_detail {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    let visible = page.visible();
    let selected_id = table
        .selected()
        .and_then(|i| visible.get(i))
        .map(|t| t.id.clone());

    let rows: Vec<Row> = visible
        .iter()
        .map(|tx| {
            let mut flags = String::new();
            if tx.is_recurring {
                flags.push('↻');
            }
            if tx.notify_advisor {
                flags.push('✉');
            }
            if !tx.attachments.is_empty() {
                flags.push_str(&format!("📎{}", tx.attachments.len()));
            }
            let recipient = if tx.is_partial_payment {
                format!("{} (Teilzahlung)", tx.recipient)
            } else {
                tx.recipient.clone()
            };
            Row::new(vec![
                Cell::from(format::date_de(tx.date)),
                Cell::from(format::truncate(&recipient, 28)),
                Cell::from(format::euro_de(tx.gross_amount)),
                Cell::from(tx.vat_rate_label()),
                Cell::from(format::euro_de(tx.vat)),
                Cell::from(tx.classification.label()),
                Cell::from(tx.status.label()).style(Style::default().fg(mandant_color(tx.status))),
                Cell::from(flags),
            ])
        })
        .collect();

    let filter = &page.filter;
    let mut title = format!(" Konto-Vorgänge · {}", filter.status.label());
    if let Some(period) = page.period_label() {
        title.push_str(&format!(" · {}", period));
    }
    if !filter.search.is_empty() {
        title.push_str(&format!(" · Suche: \"{}\"", filter.search));
    }
    title.push(' ');

    let widths = [
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(6),
    ];
    let table_widget = Table::new(rows, widths)
        .header(header_row(&[
            "Datum", "Empfänger", "Brutto", "USt %", "USt", "Art", "Status", "",
        ]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");
    f.render_stateful_widget(table_widget, chunks[0], table);

    if show_detail {
        let width = chunks[1].width.saturating_sub(6) as usize;
        let mut content = vec![Line::from("")];
        match selected_id.as_deref().and_then(|id| page.find(id)) {
            Some(tx) => {
                content.push(Line::from(vec![label("Datum"), Span::raw(format::date_de(tx.date))]));
                content.push(Line::from(vec![label("Empfänger"), Span::raw(tx.recipient.clone())]));
                content.push(Line::from(vec![label("Zweck"), Span::raw(tx.description.clone())]));
                content.push(Line::from(vec![
                    label("Brutto"),
                    Span::raw(format::euro_de(tx.gross_amount)),
                ]));
                content.push(Line::from(vec![
                    label("Status"),
                    Span::styled(tx.status.label(), Style::default().fg(mandant_color(tx.status))),
                ]));

                if let Some(message) = &tx.advisor_message {
                    content.push(Line::from(""));
                    let when = tx
                        .advisor_message_timestamp
                        .map(format::datetime_de)
                        .unwrap_or_default();
                    content.push(section(&format!("Nachricht der Kanzlei {}", when)));
                    for line in format::wrap_text(message, width) {
                        content.push(Line::from(format!("  {}", line)));
                    }
                }
                if let Some(note) = &tx.client_note {
                    content.push(Line::from(""));
                    content.push(section("Ihr Hinweis"));
                    for line in format::wrap_text(note, width) {
                        content.push(Line::from(format!("  {}", line)));
                    }
                }
                if !tx.attachments.is_empty() {
                    content.push(Line::from(""));
                    content.push(section("Anhänge"));
                    for attachment in &tx.attachments {
                        content.push(Line::from(format!("  📎 {}", attachment)));
                    }
                }
            }
            None => content.push(hint("Kein Vorgang ausgewählt")),
        }

        if let Some(dialog) = page.upload_dialog() {
            content.push(Line::from(""));
            content.push(section("Beleg hinzufügen"));
            content.push(Line::from(format!("  Datei: {}", dialog.filename)));
        }

        f.render_widget(
            Paragraph::new(content)
                .wrap(Wrap { trim: false })
                .block(panel("Details", Color::Yellow)),
            chunks[1],
        );
    }
}

// ============================================================================
// BELEG-UPLOAD & BELEGE
// ============================================================================

fn receipt_details(receipt: &MandantReceipt) -> Vec<Line<'static>> {
    let mut content = vec![
        Line::from(""),
        Line::from(vec![label("Datei"), Span::raw(receipt.filename.clone())]),
        Line::from(vec![
            label("Hochgeladen"),
            Span::raw(format::datetime_de(receipt.uploaded_at)),
        ]),
        Line::from(vec![
            label("Betrag"),
            Span::raw(receipt.amount_text().unwrap_or_else(|| "—".to_string())),
        ]),
        Line::from(vec![
            label("Status"),
            Span::styled(
                receipt.status.label(),
                Style::default().fg(receipt_color(receipt.status)),
            ),
        ]),
        Line::from(vec![
            label("Prüfung"),
            Span::raw(receipt.review_state().label()),
        ]),
    ];

    match receipt.link_label() {
        Some(link) => {
            content.push(Line::from(vec![label("Zugeordnet zu"), Span::raw(link)]));
            content.push(Line::from(""));
            content.push(hint("t  Zum Konto-Vorgang"));
        }
        None => {
            content.push(Line::from(""));
            content.push(hint("Noch keinem Konto-Vorgang zugeordnet"));
        }
    }
    content
}

fn split_for_details(area: Rect, open: bool) -> Vec<Rect> {
    let constraints = if open {
        vec![Constraint::Percentage(60), Constraint::Percentage(40)]
    } else {
        vec![Constraint::Percentage(100)]
    };
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

pub(super) fn render_upload(
    f: &mut Frame,
    area: Rect,
    page: &MandantUploadPage,
    table: &mut TableState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let drop_zone = Paragraph::new(vec![
        Line::from(Span::styled(
            "  Belege hierher ziehen oder mit u auswählen",
            Style::default().fg(Color::White),
        )),
        hint("PDF, JPG oder PNG · mehrere Dateien kommagetrennt"),
    ])
    .block(panel("Beleg-Upload", Color::Cyan));
    f.render_widget(drop_zone, chunks[0]);

    let details = page.details();
    let body = split_for_details(chunks[1], details.is_some());

    let rows: Vec<Row> = page
        .receipts()
        .iter()
        .map(|receipt| {
            Row::new(vec![
                Cell::from(format::truncate(&receipt.filename, 36)),
                Cell::from(format::datetime_de(receipt.uploaded_at)),
                Cell::from(receipt.amount_text().unwrap_or_else(|| "—".to_string())),
                Cell::from(receipt.status.label())
                    .style(Style::default().fg(receipt_color(receipt.status))),
            ])
        })
        .collect();
    let widths = [
        Constraint::Min(24),
        Constraint::Length(17),
        Constraint::Length(12),
        Constraint::Length(28),
    ];
    let table_widget = Table::new(rows, widths)
        .header(header_row(&["Datei", "Hochgeladen", "Betrag", "Status"]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Hochgeladene Belege ({}) ", page.receipts().len())),
        )
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");
    f.render_stateful_widget(table_widget, body[0], table);

    if let Some(receipt) = details {
        f.render_widget(
            Paragraph::new(receipt_details(receipt))
                .wrap(Wrap { trim: false })
                .block(panel("Beleg", Color::Yellow)),
            body[1],
        );
    }
}

pub(super) fn render_receipts(
    f: &mut Frame,
    area: Rect,
    page: &MandantReceiptsPage,
    table: &mut TableState,
) {
    let details = page.details();
    let body = split_for_details(area, details.is_some());

    let rows: Vec<Row> = page
        .visible()
        .into_iter()
        .map(|receipt| {
            let review = receipt.review_state();
            let color = match review {
                ReceiptReviewState::Unassigned => Color::Red,
                ReceiptReviewState::InReview => Color::Yellow,
                ReceiptReviewState::Done => Color::Green,
            };
            Row::new(vec![
                Cell::from(format::truncate(&receipt.filename, 32)),
                Cell::from(format::datetime_de(receipt.uploaded_at)),
                Cell::from(receipt.amount_text().unwrap_or_else(|| "—".to_string())),
                Cell::from(
                    receipt
                        .link_label()
                        .map(|l| format::truncate(&l, 30))
                        .unwrap_or_else(|| "—".to_string()),
                ),
                Cell::from(review.label()).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let filter = &page.filter;
    let title = format!(
        " Belege · {}{} ",
        filter.status.label(),
        if filter.search.is_empty() {
            String::new()
        } else {
            format!(" · Suche: \"{}\"", filter.search)
        }
    );

    let widths = [
        Constraint::Min(22),
        Constraint::Length(17),
        Constraint::Length(12),
        Constraint::Length(30),
        Constraint::Length(26),
    ];
    let table_widget = Table::new(rows, widths)
        .header(header_row(&["Datei", "Hochgeladen", "Betrag", "Vorgang", "Prüfung"]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight_style())
        .highlight_symbol("→ ");
    f.render_stateful_widget(table_widget, body[0], table);

    if let Some(receipt) = details {
        f.render_widget(
            Paragraph::new(receipt_details(receipt))
                .wrap(Wrap { trim: false })
                .block(panel("Beleg", Color::Yellow)),
            body[1],
        );
    }
}
