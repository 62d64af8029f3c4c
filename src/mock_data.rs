// Mock data for both personas
//
// Every call builds fresh values, so a page that mutates its copy never
// affects another page or a later visit.

use chrono::{NaiveDate, NaiveDateTime};

use crate::entities::{
    Classification, Client, ClientStatus, InboxItem, MandantReceipt, MandantStatus,
    MandantTransaction, MatchStatus, Message, MessageKind, PeriodHealth, Receipt, ReceiptStatus,
    Transaction, TransactionLink, VatCadence, VatPeriod, VatPeriodStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap_or_default()
}

// ============================================================================
// KANZLEI
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn client(
    id: &str,
    name: &str,
    vat_cadence: VatCadence,
    counters: (u32, u32, u32, u8),
    current: VatPeriod,
    next: VatPeriod,
) -> Client {
    let (bank_transactions, unmatched_bank_transactions, unmatched_receipts, receipt_completeness) =
        counters;
    Client {
        id: id.to_string(),
        name: name.to_string(),
        vat_cadence,
        bank_transactions,
        unmatched_bank_transactions,
        unmatched_receipts,
        receipt_completeness,
        current_vat_period: current,
        next_vat_period: next,
    }
}

pub fn clients() -> Vec<Client> {
    use ClientStatus::{AtRisk, OnTrack};
    use VatCadence::{Monthly, Quarterly};

    vec![
        client(
            "1",
            "Müller GmbH",
            Monthly,
            (125, 18, 9, 86),
            VatPeriod::new("März 2026", 78, "10.04.", AtRisk),
            VatPeriod::new("April 2026", 15, "10.05.", OnTrack),
        ),
        client(
            "2",
            "Schmidt Consulting",
            Quarterly,
            (87, 5, 2, 95),
            VatPeriod::new("Q1 2026", 92, "10.04.", OnTrack),
            VatPeriod::new("Q2 2026", 8, "10.07.", OnTrack),
        ),
        client(
            "3",
            "Bauer & Co. KG",
            Monthly,
            (203, 24, 15, 78),
            VatPeriod::new("März 2026", 65, "10.04.", AtRisk),
            VatPeriod::new("April 2026", 22, "10.05.", OnTrack),
        ),
        client(
            "4",
            "Alpha Design Studio",
            Quarterly,
            (64, 3, 1, 98),
            VatPeriod::new("Q1 2026", 96, "10.04.", OnTrack),
            VatPeriod::new("Q2 2026", 5, "10.07.", OnTrack),
        ),
        client(
            "5",
            "GreenTech Solutions",
            Monthly,
            (156, 8, 4, 92),
            VatPeriod::new("März 2026", 88, "10.04.", OnTrack),
            VatPeriod::new("April 2026", 12, "10.05.", OnTrack),
        ),
        client(
            "6",
            "Fischer Handels GmbH",
            Monthly,
            (178, 21, 12, 82),
            VatPeriod::new("März 2026", 70, "10.04.", AtRisk),
            VatPeriod::new("April 2026", 18, "10.05.", OnTrack),
        ),
    ]
}

pub fn find_client(id: &str) -> Option<Client> {
    clients().into_iter().find(|c| c.id == id)
}

fn receipt(id: &str, supplier: &str, on: NaiveDate, amount: f64, vat: f64, description: &str) -> Receipt {
    Receipt {
        id: id.to_string(),
        supplier: supplier.to_string(),
        date: on,
        amount,
        vat,
        description: description.to_string(),
    }
}

pub fn receipts() -> Vec<Receipt> {
    vec![
        receipt("r1", "Office Depot GmbH", date(2026, 3, 5), 247.50, 39.60, "Office supplies - paper, pens, folders"),
        receipt("r2", "Deutsche Telekom", date(2026, 3, 10), 89.99, 14.39, "Monthly phone and internet service"),
        receipt("r3", "Shell Station", date(2026, 3, 12), 65.00, 10.40, "Fuel"),
        receipt("r4", "Amazon Business", date(2026, 3, 15), 156.80, 25.09, "Computer accessories"),
        receipt("r5", "Café Central", date(2026, 3, 18), 42.50, 6.80, "Business lunch"),
        receipt("r6", "Tech Solutions AG", date(2026, 3, 20), 1250.00, 200.00, "Software license annual renewal"),
        receipt("r7", "Mobility Car Rental", date(2026, 3, 22), 189.00, 30.24, "Car rental for business trip"),
    ]
}

/// Bank transactions of the matching view. Every client currently sees the same set.
pub fn transactions() -> Vec<Transaction> {
    use MatchStatus::{Matched, Suggestion, Unmatched};

    let r = receipts();
    let tx = Transaction::new;

    vec![
        tx("t1", date(2026, 3, 5), 247.50, "OFFICE DEPOT GMBH", Matched)
            .with_suggestion(r[0].clone())
            .with_available(vec![r[3].clone()]),
        tx("t2", date(2026, 3, 8), 1500.00, "CLIENT PAYMENT - INV 2024-045", Unmatched),
        tx("t3", date(2026, 3, 10), 89.99, "DEUTSCHE TELEKOM", Suggestion)
            .with_suggestion(r[1].clone()),
        tx("t4", date(2026, 3, 12), 65.00, "SHELL TANKSTELLE", Suggestion)
            .with_suggestion(r[2].clone())
            .with_available(vec![r[4].clone()]),
        tx("t5", date(2026, 3, 14), 320.00, "RENT - OFFICE SPACE", Unmatched),
        tx("t6", date(2026, 3, 15), 156.80, "AMAZON BUSINESS EU", Matched)
            .with_suggestion(r[3].clone())
            .with_available(vec![r[0].clone()]),
        tx("t7", date(2026, 3, 17), 75.00, "CASH WITHDRAWAL", Unmatched)
            .with_available(vec![r[4].clone()]),
        tx("t8", date(2026, 3, 18), 42.50, "CAFE CENTRAL", Suggestion)
            .with_suggestion(r[4].clone()),
        tx("t9", date(2026, 3, 20), 1250.00, "TECH SOLUTIONS AG", Matched)
            .with_suggestion(r[5].clone()),
        tx("t10", date(2026, 3, 22), 189.00, "MOBILITY CAR RENTAL", Suggestion)
            .with_suggestion(r[6].clone()),
        tx("t11", date(2026, 3, 24), 45.00, "PARKING GARAGE", Unmatched),
        tx("t12", date(2026, 3, 25), 2500.00, "CLIENT PAYMENT - INV 2024-048", Unmatched),
        tx("t13", date(2026, 3, 26), 98.50, "STATIONERY SHOP", Suggestion)
            .with_suggestion(r[0].clone())
            .with_available(vec![r[3].clone()]),
        tx("t14", date(2026, 3, 28), 145.00, "COURIER SERVICE DHL", Unmatched),
        tx("t15", date(2026, 3, 30), 67.80, "OFFICE CLEANING SERVICE", Matched)
            .with_suggestion(r[0].clone()),
    ]
}

pub fn transactions_for(_client_id: &str) -> Vec<Transaction> {
    transactions()
}

#[allow(clippy::too_many_arguments)]
fn inbox_item(
    id: &str,
    client: &Client,
    on: NaiveDate,
    amount: f64,
    description: &str,
    status: MatchStatus,
    days_open: u32,
) -> InboxItem {
    InboxItem {
        id: id.to_string(),
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        date: on,
        amount,
        description: description.to_string(),
        status,
        days_open,
    }
}

pub fn inbox_items() -> Vec<InboxItem> {
    use MatchStatus::{Matched, Suggestion, Unmatched, Waiting};

    let c = clients();
    let (mueller, schmidt, bauer, alpha, greentech, fischer) =
        (&c[0], &c[1], &c[2], &c[3], &c[4], &c[5]);

    vec![
        inbox_item("i1", mueller, date(2026, 3, 8), 1500.00, "CLIENT PAYMENT - INV 2024-045", Unmatched, 23),
        inbox_item("i2", mueller, date(2026, 3, 14), 320.00, "RENT - OFFICE SPACE", Waiting, 17),
        inbox_item("i3", mueller, date(2026, 3, 10), 89.99, "DEUTSCHE TELEKOM", Suggestion, 21),
        inbox_item("i4", bauer, date(2026, 3, 24), 45.00, "PARKING GARAGE", Unmatched, 7),
        inbox_item("i5", bauer, date(2026, 3, 28), 145.00, "COURIER SERVICE DHL", Unmatched, 3),
        inbox_item("i6", bauer, date(2026, 2, 19), 612.40, "BAUHAUS FILIALE 0815", Waiting, 40),
        inbox_item("i7", fischer, date(2026, 3, 17), 75.00, "CASH WITHDRAWAL", Unmatched, 14),
        inbox_item("i8", fischer, date(2026, 3, 25), 2500.00, "CLIENT PAYMENT - INV 2024-048", Suggestion, 6),
        inbox_item("i9", fischer, date(2026, 2, 11), 1180.00, "LKW LEASING RATE FEBRUAR", Unmatched, 48),
        inbox_item("i10", greentech, date(2026, 3, 22), 189.00, "MOBILITY CAR RENTAL", Suggestion, 9),
        inbox_item("i11", greentech, date(2026, 3, 30), 67.80, "OFFICE CLEANING SERVICE", Matched, 1),
        inbox_item("i12", schmidt, date(2026, 3, 12), 65.00, "SHELL TANKSTELLE", Waiting, 19),
        inbox_item("i13", alpha, date(2026, 1, 27), 98.50, "STATIONERY SHOP", Unmatched, 63),
    ]
}

// ============================================================================
// MANDANT
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn mandant_tx(
    id: &str,
    on: NaiveDate,
    recipient: &str,
    description: &str,
    gross_amount: f64,
    vat_rate: f64,
    vat: f64,
    status: MandantStatus,
    month: &str,
) -> MandantTransaction {
    MandantTransaction {
        id: id.to_string(),
        date: on,
        recipient: recipient.to_string(),
        description: description.to_string(),
        is_partial_payment: false,
        gross_amount,
        vat_rate,
        vat,
        classification: Classification::Geschaeftlich,
        status,
        month: month.to_string(),
        year: chrono::Datelike::year(&on),
        is_recurring: false,
        notify_advisor: false,
        attachments: Vec::new(),
        advisor_message: None,
        advisor_message_timestamp: None,
        client_note: None,
    }
}

pub fn mandant_transactions() -> Vec<MandantTransaction> {
    use MandantStatus::{Eingereicht, Erledigt, Offen};

    let mut first = mandant_tx("1", date(2024, 2, 28), "Lieferant AG", "Rechnung 2024-051 Teil 1/2", -5000.00, 19.00, -798.32, Offen, "Februar");
    first.is_partial_payment = true;

    vec![
        first,
        mandant_tx("2", date(2024, 2, 25), "Hotel Adlon", "Übernachtung Geschäftsreise Berlin", -450.00, 7.00, -29.44, Eingereicht, "Februar"),
        mandant_tx("3", date(2024, 2, 20), "Deutsche Bahn", "ICE Tickets Hamburg-Berlin", -180.00, 19.00, -28.74, Offen, "Februar"),
        mandant_tx("4", date(2024, 2, 15), "Office Supplies GmbH", "Büromaterial Februar", -320.50, 19.00, -51.16, Erledigt, "Februar"),
        mandant_tx("5", date(2024, 2, 10), "Restaurant Zur Post", "Geschäftsessen Kunde Meier", -125.00, 19.00, -19.96, Eingereicht, "Februar"),
        mandant_tx("6", date(2026, 3, 15), "Software AG", "Lizenzgebühr Q1/2026", -2400.00, 19.00, -383.19, Offen, "März"),
        mandant_tx("7", date(2026, 3, 10), "Tankstelle Shell", "Kraftstoff Firmenwagen", -95.50, 19.00, -15.24, Offen, "März"),
        mandant_tx("8", date(2026, 3, 5), "Telekom", "Rechnung Internet & Telefon", -89.90, 19.00, -14.35, Eingereicht, "März"),
        mandant_tx("9", date(2024, 1, 25), "Handwerker Müller", "Renovierung Büroräume", -1500.00, 19.00, -239.50, Offen, "Januar"),
        mandant_tx("10", date(2024, 1, 15), "Amazon Business", "IT-Equipment", -850.00, 19.00, -135.71, Erledigt, "Januar"),
    ]
}

fn linked(id: &str, description: &str, on: NaiveDate) -> Option<TransactionLink> {
    Some(TransactionLink {
        id: id.to_string(),
        description: Some(description.to_string()),
        date: Some(on),
    })
}

fn mandant_receipt(
    id: &str,
    filename: &str,
    uploaded_at: NaiveDateTime,
    amount: f64,
    status: ReceiptStatus,
    linked_transaction: Option<TransactionLink>,
) -> MandantReceipt {
    MandantReceipt {
        id: id.to_string(),
        filename: filename.to_string(),
        uploaded_at,
        amount: Some(amount),
        status,
        linked_transaction,
    }
}

pub fn mandant_receipts() -> Vec<MandantReceipt> {
    use ReceiptStatus::{Neu, Verarbeitet, Vorgeschlagen, Zugeordnet};

    vec![
        mandant_receipt("r1", "Rechnung_Bürobedarf_Express.pdf", timestamp(2026, 3, 15, 10, 30), 247.50, Zugeordnet, linked("t1", "Bürobedarf-Express", date(2026, 3, 15))),
        mandant_receipt("r2", "Hotel_Adlon_Berlin.pdf", timestamp(2024, 2, 26, 14, 20), 450.00, Verarbeitet, linked("2", "Hotel Adlon", date(2024, 2, 25))),
        mandant_receipt("r3", "Tankbeleg_Shell_März.jpg", timestamp(2026, 3, 13, 8, 45), 65.00, Vorgeschlagen, linked("t4", "Shell Tankstelle", date(2026, 3, 12))),
        mandant_receipt("r4", "Bewirtung_Restaurant_Meier.pdf", timestamp(2026, 3, 20, 16, 10), 125.00, Neu, None),
        mandant_receipt("r5", "Telekom_Rechnung_März_2026.pdf", timestamp(2026, 3, 11, 9, 15), 89.99, Zugeordnet, linked("t3", "Deutsche Telekom", date(2026, 3, 10))),
        mandant_receipt("r6", "Handwerker_Rechnung.pdf", timestamp(2024, 1, 26, 11, 30), 1500.00, Neu, None),
        mandant_receipt("r7", "Amazon_Business_Bestellung.pdf", timestamp(2024, 1, 16, 13, 45), 850.00, Verarbeitet, linked("10", "Amazon Business", date(2024, 1, 15))),
    ]
}

pub fn current_vat_period() -> VatPeriodStatus {
    VatPeriodStatus {
        month: "März".to_string(),
        year: 2026,
        missing_receipts: 4,
        completeness: 72,
        status: PeriodHealth::Kritisch,
        due_date: Some("10.04.2026".to_string()),
    }
}

fn critical_period(month: &str, year: i32, missing_receipts: u32, completeness: u8) -> VatPeriodStatus {
    VatPeriodStatus {
        month: month.to_string(),
        year,
        missing_receipts,
        completeness,
        status: PeriodHealth::Kritisch,
        due_date: None,
    }
}

pub fn periods_needing_attention() -> Vec<VatPeriodStatus> {
    vec![
        critical_period("Februar", 2024, 3, 65),
        critical_period("Januar", 2024, 2, 78),
        critical_period("Dezember", 2023, 5, 58),
    ]
}

fn message(id: &str, from: &str, kind: MessageKind, text: &str, on: NaiveDate) -> Message {
    Message {
        id: id.to_string(),
        from: from.to_string(),
        kind,
        text: text.to_string(),
        date: on,
    }
}

pub fn messages() -> Vec<Message> {
    use MessageKind::{Kanzlei, System};

    vec![
        message("1", "Sabine Kramer", Kanzlei, "Für März fehlen noch 4 Belege (Hotel, Bahn, Bewirtung).", date(2026, 3, 28)),
        message("2", "System", System, "Die PSP-Abrechnung von PayPal für Februar 2024 liegt noch nicht vor.", date(2026, 3, 27)),
        message("3", "Ihre Kanzlei", Kanzlei, "Bitte denken Sie an die Reisekostenabrechnung für die Dienstreise nach Berlin.", date(2026, 3, 25)),
        message("4", "System", System, "Erinnerung: Die UStVA-Frist für März endet am 10.04.2026.", date(2026, 3, 24)),
        message("5", "Sabine Kramer", Kanzlei, "Bitte laden Sie die ausstehenden Tankbelege für Februar hoch.", date(2026, 3, 22)),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
