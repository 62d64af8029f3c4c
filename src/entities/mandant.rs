// 👤 Mandant-facing records
//
// The client portal sees its own bank movements (with VAT breakdown and
// classification), the receipts it uploaded, its UStVA periods and the
// messages from the office.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;
use crate::format;

// ============================================================================
// MANDANT TRANSACTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Geschäftlich")]
    Geschaeftlich,
    #[serde(rename = "Privat")]
    Privat,
    #[serde(rename = "Zahlungsdienstleister")]
    Zahlungsdienstleister,
    #[serde(rename = "Sonstiges")]
    Sonstiges,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Geschaeftlich => "Geschäftlich",
            Classification::Privat => "Privat",
            Classification::Zahlungsdienstleister => "Zahlungsdienstleister",
            Classification::Sonstiges => "Sonstiges",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MandantStatus {
    /// Receipt still missing
    Offen,
    /// Receipt handed in, office has not booked it yet
    Eingereicht,
    Erledigt,
}

impl MandantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MandantStatus::Offen => "offen",
            MandantStatus::Eingereicht => "eingereicht",
            MandantStatus::Erledigt => "erledigt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MandantStatus::Offen => "Offen",
            MandantStatus::Eingereicht => "Eingereicht",
            MandantStatus::Erledigt => "Erledigt",
        }
    }
}

impl FromStr for MandantStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offen" => Ok(MandantStatus::Offen),
            "eingereicht" => Ok(MandantStatus::Eingereicht),
            "erledigt" => Ok(MandantStatus::Erledigt),
            other => Err(Error::invalid("mandant status", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandantTransaction {
    pub id: String,
    pub date: NaiveDate,
    pub recipient: String,
    pub description: String,
    #[serde(default)]
    pub is_partial_payment: bool,

    /// Negative for outgoing payments
    pub gross_amount: f64,

    /// Percent, e.g. 19.0
    pub vat_rate: f64,
    pub vat: f64,

    pub classification: Classification,
    pub status: MandantStatus,

    /// German month name of the booking period ("Februar")
    pub month: String,
    pub year: i32,

    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub notify_advisor: bool,
    #[serde(default)]
    pub attachments: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_message_timestamp: Option<NaiveDateTime>,

    /// Note the client typed when handing in a receipt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_note: Option<String>,
}

impl MandantTransaction {
    pub fn is_open(&self) -> bool {
        self.status == MandantStatus::Offen
    }

    pub fn in_period(&self, month: &str, year: i32) -> bool {
        self.month == month && self.year == year
    }

    /// "19,00 %"
    pub fn vat_rate_label(&self) -> String {
        format!("{} %", format::decimal_de(self.vat_rate))
    }
}

// ============================================================================
// MANDANT RECEIPT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Neu,
    Vorgeschlagen,
    Zugeordnet,
    Verarbeitet,
}

impl ReceiptStatus {
    /// Badge text on the upload page
    pub fn label(&self) -> &'static str {
        match self {
            ReceiptStatus::Neu => "Neu – noch nicht zugeordnet",
            ReceiptStatus::Vorgeschlagen => "Zuordnung vorgeschlagen",
            ReceiptStatus::Zugeordnet => "Zugeordnet",
            ReceiptStatus::Verarbeitet => "Von Kanzlei verarbeitet",
        }
    }
}

/// Transaction a receipt was assigned to. Free-form, not checked against any list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLink {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Review state shown on the receipts list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceiptReviewState {
    Unassigned,
    InReview,
    Done,
}

impl ReceiptReviewState {
    pub fn label(&self) -> &'static str {
        match self {
            ReceiptReviewState::Unassigned => "Ohne Zuordnung",
            ReceiptReviewState::InReview => "Zur Prüfung in der Kanzlei",
            ReceiptReviewState::Done => "Erledigt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandantReceipt {
    pub id: String,
    pub filename: String,
    pub uploaded_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub status: ReceiptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_transaction: Option<TransactionLink>,
}

impl MandantReceipt {
    pub fn is_linked(&self) -> bool {
        self.linked_transaction.is_some()
    }

    pub fn review_state(&self) -> ReceiptReviewState {
        if self.status == ReceiptStatus::Verarbeitet {
            ReceiptReviewState::Done
        } else if self.is_linked() {
            ReceiptReviewState::InReview
        } else {
            ReceiptReviewState::Unassigned
        }
    }

    pub fn amount_text(&self) -> Option<String> {
        self.amount.map(format::plain_number)
    }

    /// "Bürobedarf-Express – 15.03.2026", present only when description and date are known
    pub fn link_label(&self) -> Option<String> {
        let link = self.linked_transaction.as_ref()?;
        match (&link.description, link.date) {
            (Some(description), Some(date)) => {
                Some(format!("{} – {}", description, format::date_de(date)))
            }
            _ => None,
        }
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodHealth {
    ImPlan,
    Kritisch,
}

impl PeriodHealth {
    pub fn label(&self) -> &'static str {
        match self {
            PeriodHealth::ImPlan => "Im Plan",
            PeriodHealth::Kritisch => "Kritisch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatPeriodStatus {
    pub month: String,
    pub year: i32,
    pub missing_receipts: u32,
    pub completeness: u8,
    pub status: PeriodHealth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl VatPeriodStatus {
    pub fn title(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    pub fn missing_label(&self) -> String {
        if self.missing_receipts > 0 {
            format!("{} Belege fehlen", self.missing_receipts)
        } else {
            "Alle Belege vorhanden".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Kanzlei,
    System,
}

impl MessageKind {
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Kanzlei => "Kanzlei",
            MessageKind::System => "System",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub kind: MessageKind,
    pub text: String,
    pub date: NaiveDate,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(status: ReceiptStatus, linked: bool) -> MandantReceipt {
        MandantReceipt {
            id: "r1".to_string(),
            filename: "Rechnung.pdf".to_string(),
            uploaded_at: NaiveDate::from_ymd_opt(2026, 3, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            amount: Some(247.5),
            status,
            linked_transaction: linked.then(|| TransactionLink {
                id: "t1".to_string(),
                description: Some("Bürobedarf-Express".to_string()),
                date: NaiveDate::from_ymd_opt(2026, 3, 15),
            }),
        }
    }

    #[test]
    fn test_review_state() {
        assert_eq!(
            receipt(ReceiptStatus::Verarbeitet, true).review_state(),
            ReceiptReviewState::Done
        );
        assert_eq!(
            receipt(ReceiptStatus::Zugeordnet, true).review_state(),
            ReceiptReviewState::InReview
        );
        assert_eq!(
            receipt(ReceiptStatus::Neu, false).review_state(),
            ReceiptReviewState::Unassigned
        );
    }

    #[test]
    fn test_link_label() {
        assert_eq!(
            receipt(ReceiptStatus::Zugeordnet, true).link_label().as_deref(),
            Some("Bürobedarf-Express – 15.03.2026")
        );
        assert_eq!(receipt(ReceiptStatus::Neu, false).link_label(), None);
    }

    #[test]
    fn test_missing_label() {
        let mut period = VatPeriodStatus {
            month: "März".to_string(),
            year: 2026,
            missing_receipts: 4,
            completeness: 72,
            status: PeriodHealth::Kritisch,
            due_date: Some("10.04.2026".to_string()),
        };
        assert_eq!(period.missing_label(), "4 Belege fehlen");
        assert_eq!(period.title(), "März 2026");

        period.missing_receipts = 0;
        assert_eq!(period.missing_label(), "Alle Belege vorhanden");
    }

    #[test]
    fn test_classification_serializes_with_umlaut() {
        let json = serde_json::to_string(&Classification::Geschaeftlich).unwrap();
        assert_eq!(json, "\"Geschäftlich\"");
    }
}
