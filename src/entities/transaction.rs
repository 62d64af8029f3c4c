// 🧾 Bank Transaction & Receipt - the two sides of matching
//
// A transaction carries its matching status plus the receipts that could
// explain it. Status changes are plain field updates on the page's copy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::format;

// ============================================================================
// MATCH STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// No receipt found yet
    Unmatched,

    /// A receipt was proposed and awaits confirmation
    Suggestion,

    /// Confirmed or otherwise resolved
    Matched,

    /// Receipt requested from the client
    Waiting,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::Unmatched,
        MatchStatus::Suggestion,
        MatchStatus::Matched,
        MatchStatus::Waiting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Unmatched => "unmatched",
            MatchStatus::Suggestion => "suggestion",
            MatchStatus::Matched => "matched",
            MatchStatus::Waiting => "waiting",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Unmatched => "Unmatched",
            MatchStatus::Suggestion => "Suggestion",
            MatchStatus::Matched => "Matched",
            MatchStatus::Waiting => "Waiting for client",
        }
    }

    pub fn is_open(&self) -> bool {
        *self != MatchStatus::Matched
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MatchStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::invalid("match status", s))
    }
}

// ============================================================================
// RECEIPT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub supplier: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub vat: f64,
    pub description: String,
}

// ============================================================================
// RESOLUTION & CLIENT REQUEST
// ============================================================================

/// How a matched transaction was settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Resolution {
    Receipt { receipt_id: String },
    CashPayment,
    NotRelevant,
}

impl Resolution {
    pub fn label(&self) -> String {
        match self {
            Resolution::Receipt { receipt_id } => format!("Receipt {}", receipt_id),
            Resolution::CashPayment => "Cash payment".to_string(),
            Resolution::NotRelevant => "Not relevant".to_string(),
        }
    }
}

/// Receipt request sent to the client for a waiting transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub id: String,
    pub requested_at: DateTime<Utc>,
    pub message: String,
}

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub status: MatchStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_receipt: Option<Receipt>,

    #[serde(default)]
    pub available_receipts: Vec<Receipt>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ClientRequest>,
}

impl Transaction {
    pub fn new(id: &str, date: NaiveDate, amount: f64, description: &str, status: MatchStatus) -> Self {
        Transaction {
            id: id.to_string(),
            date,
            amount,
            description: description.to_string(),
            status,
            suggested_receipt: None,
            available_receipts: Vec::new(),
            resolution: None,
            request: None,
        }
    }

    pub fn with_suggestion(mut self, receipt: Receipt) -> Self {
        self.suggested_receipt = Some(receipt);
        self
    }

    pub fn with_available(mut self, receipts: Vec<Receipt>) -> Self {
        self.available_receipts = receipts;
        self
    }

    /// Amount as typed into a search box ("247.5", "1500")
    pub fn amount_text(&self) -> String {
        format::plain_number(self.amount)
    }

    /// Confirm the suggested receipt. Returns false when there is none.
    pub fn confirm_match(&mut self) -> bool {
        let receipt_id = match &self.suggested_receipt {
            Some(receipt) => receipt.id.clone(),
            None => return false,
        };
        self.status = MatchStatus::Matched;
        self.resolution = Some(Resolution::Receipt { receipt_id });
        self.request = None;
        true
    }

    /// Swap the suggestion for one of the other available receipts
    pub fn choose_receipt(&mut self, receipt_id: &str) -> Result<()> {
        let position = self
            .available_receipts
            .iter()
            .position(|r| r.id == receipt_id)
            .ok_or_else(|| Error::ReceiptNotFound(receipt_id.to_string()))?;

        let chosen = self.available_receipts.remove(position);
        if let Some(previous) = self.suggested_receipt.replace(chosen) {
            self.available_receipts.push(previous);
        }
        self.status = MatchStatus::Suggestion;
        self.resolution = None;
        Ok(())
    }

    pub fn mark_cash_payment(&mut self) {
        self.resolve_without_receipt(Resolution::CashPayment);
    }

    pub fn mark_not_relevant(&mut self) {
        self.resolve_without_receipt(Resolution::NotRelevant);
    }

    fn resolve_without_receipt(&mut self, resolution: Resolution) {
        self.status = MatchStatus::Matched;
        self.resolution = Some(resolution);
        self.request = None;
    }

    pub fn mark_waiting(&mut self, request: ClientRequest) {
        self.status = MatchStatus::Waiting;
        self.resolution = None;
        self.request = Some(request);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(id: &str, amount: f64) -> Receipt {
        Receipt {
            id: id.to_string(),
            supplier: "Supplier".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            amount,
            vat: amount * 0.16,
            description: "Test".to_string(),
        }
    }

    fn transaction(status: MatchStatus) -> Transaction {
        Transaction::new(
            "t1",
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            247.5,
            "OFFICE DEPOT GMBH",
            status,
        )
    }

    #[test]
    fn test_amount_text_is_shortest_decimal() {
        assert_eq!(transaction(MatchStatus::Unmatched).amount_text(), "247.5");

        let mut whole = transaction(MatchStatus::Unmatched);
        whole.amount = 1500.0;
        assert_eq!(whole.amount_text(), "1500");
    }

    #[test]
    fn test_confirm_match_requires_suggestion() {
        let mut tx = transaction(MatchStatus::Unmatched);
        assert!(!tx.confirm_match());
        assert_eq!(tx.status, MatchStatus::Unmatched);

        let mut tx = transaction(MatchStatus::Suggestion).with_suggestion(receipt("r1", 247.5));
        assert!(tx.confirm_match());
        assert_eq!(tx.status, MatchStatus::Matched);
        assert_eq!(
            tx.resolution,
            Some(Resolution::Receipt { receipt_id: "r1".to_string() })
        );
    }

    #[test]
    fn test_choose_receipt_swaps_suggestion() {
        let mut tx = transaction(MatchStatus::Matched)
            .with_suggestion(receipt("r1", 247.5))
            .with_available(vec![receipt("r4", 156.8)]);

        tx.choose_receipt("r4").unwrap();

        assert_eq!(tx.status, MatchStatus::Suggestion);
        assert_eq!(tx.suggested_receipt.as_ref().unwrap().id, "r4");
        assert_eq!(tx.available_receipts.len(), 1);
        assert_eq!(tx.available_receipts[0].id, "r1");
        assert!(tx.resolution.is_none());

        assert!(matches!(
            tx.choose_receipt("r99"),
            Err(Error::ReceiptNotFound(_))
        ));
    }

    #[test]
    fn test_mark_without_receipt() {
        let mut tx = transaction(MatchStatus::Unmatched);
        tx.mark_cash_payment();
        assert_eq!(tx.status, MatchStatus::Matched);
        assert_eq!(tx.resolution, Some(Resolution::CashPayment));

        tx.mark_not_relevant();
        assert_eq!(tx.resolution, Some(Resolution::NotRelevant));
    }

    #[test]
    fn test_match_status_round_trip_names() {
        for status in MatchStatus::ALL {
            assert_eq!(status.as_str().parse::<MatchStatus>().unwrap(), status);
        }
        assert!("open".parse::<MatchStatus>().is_err());
        assert!(!MatchStatus::Matched.is_open());
        assert!(MatchStatus::Waiting.is_open());
    }
}
