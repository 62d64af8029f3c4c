// 🏢 Client Entity - one Mandant as seen from the Kanzlei
//
// Counters and VAT periods are fixed values; the risk status is derived
// from them on every read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Unmatched bank transactions above this are highlighted and make a client at risk
pub const UNMATCHED_TRANSACTION_ALERT: u32 = 15;

/// Unmatched receipts above this are highlighted
pub const UNMATCHED_RECEIPT_ALERT: u32 = 10;

/// From this many unmatched transactions the detail KPI badge reads "High"
pub const HIGH_UNMATCHED_FROM: u32 = 10;

// ============================================================================
// STATUS & CADENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientStatus {
    OnTrack,
    AtRisk,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::OnTrack => "on-track",
            ClientStatus::AtRisk => "at-risk",
        }
    }

    /// Badge text on client cards and the detail header
    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::OnTrack => "On track",
            ClientStatus::AtRisk => "At risk",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-track" => Ok(ClientStatus::OnTrack),
            "at-risk" => Ok(ClientStatus::AtRisk),
            other => Err(Error::invalid("client status", other)),
        }
    }
}

/// How often the client files the UStVA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VatCadence {
    Monthly,
    Quarterly,
}

impl VatCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            VatCadence::Monthly => "monthly",
            VatCadence::Quarterly => "quarterly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VatCadence::Monthly => "Monatlicher USt-Melder",
            VatCadence::Quarterly => "Vierteljährlicher USt-Melder",
        }
    }
}

impl FromStr for VatCadence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(VatCadence::Monthly),
            "quarterly" => Ok(VatCadence::Quarterly),
            other => Err(Error::invalid("vat cadence", other)),
        }
    }
}

// ============================================================================
// VAT PERIOD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatPeriod {
    /// "März 2026", "Q1 2026"
    pub label: String,

    /// Receipt completeness of the period in percent
    pub completeness: u8,

    /// Day and month only, e.g. "10.04."
    pub due_date: String,

    pub status: ClientStatus,
}

impl VatPeriod {
    pub fn new(label: &str, completeness: u8, due_date: &str, status: ClientStatus) -> Self {
        VatPeriod {
            label: label.to_string(),
            completeness,
            due_date: due_date.to_string(),
            status,
        }
    }

    /// "März 2026 – 78% vollständig – Fällig am 10.04."
    pub fn summary(&self) -> String {
        format!(
            "{} – {}% vollständig – Fällig am {}",
            self.label, self.completeness, self.due_date
        )
    }
}

// ============================================================================
// CLIENT ENTITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedLevel {
    Low,
    High,
}

impl UnmatchedLevel {
    pub fn label(&self) -> &'static str {
        match self {
            UnmatchedLevel::Low => "Low",
            UnmatchedLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub vat_cadence: VatCadence,

    /// Bank transactions in the current period
    pub bank_transactions: u32,
    pub unmatched_bank_transactions: u32,
    pub unmatched_receipts: u32,

    /// Percent of receipts matched
    pub receipt_completeness: u8,

    pub current_vat_period: VatPeriod,
    pub next_vat_period: VatPeriod,
}

impl Client {
    /// Derived risk status
    pub fn status(&self) -> ClientStatus {
        if self.current_vat_period.status == ClientStatus::AtRisk
            || self.unmatched_bank_transactions > UNMATCHED_TRANSACTION_ALERT
        {
            ClientStatus::AtRisk
        } else {
            ClientStatus::OnTrack
        }
    }

    pub fn is_at_risk(&self) -> bool {
        self.status() == ClientStatus::AtRisk
    }

    /// Unmatched bank transactions plus unmatched receipts
    pub fn unmatched_total(&self) -> u32 {
        self.unmatched_bank_transactions + self.unmatched_receipts
    }

    pub fn unmatched_level(&self) -> UnmatchedLevel {
        if self.unmatched_bank_transactions < HIGH_UNMATCHED_FROM {
            UnmatchedLevel::Low
        } else {
            UnmatchedLevel::High
        }
    }

    pub fn transactions_alert(&self) -> bool {
        self.unmatched_bank_transactions > UNMATCHED_TRANSACTION_ALERT
    }

    pub fn receipts_alert(&self) -> bool {
        self.unmatched_receipts > UNMATCHED_RECEIPT_ALERT
    }

    /// Client reminders sent in the current period
    pub fn reminders_this_period(&self) -> u32 {
        match self.status() {
            ClientStatus::OnTrack => 1,
            ClientStatus::AtRisk => 3,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client(unmatched: u32, period_status: ClientStatus) -> Client {
        Client {
            id: "x".to_string(),
            name: "Test GmbH".to_string(),
            vat_cadence: VatCadence::Monthly,
            bank_transactions: 100,
            unmatched_bank_transactions: unmatched,
            unmatched_receipts: 4,
            receipt_completeness: 90,
            current_vat_period: VatPeriod::new("März 2026", 90, "10.04.", period_status),
            next_vat_period: VatPeriod::new("April 2026", 10, "10.05.", ClientStatus::OnTrack),
        }
    }

    #[test]
    fn test_status_follows_current_period() {
        assert_eq!(client(3, ClientStatus::OnTrack).status(), ClientStatus::OnTrack);
        assert_eq!(client(3, ClientStatus::AtRisk).status(), ClientStatus::AtRisk);
    }

    #[test]
    fn test_status_at_risk_above_unmatched_alert() {
        assert_eq!(client(15, ClientStatus::OnTrack).status(), ClientStatus::OnTrack);
        assert_eq!(client(16, ClientStatus::OnTrack).status(), ClientStatus::AtRisk);
    }

    #[test]
    fn test_unmatched_level_and_reminders() {
        let low = client(9, ClientStatus::OnTrack);
        assert_eq!(low.unmatched_level(), UnmatchedLevel::Low);
        assert_eq!(low.reminders_this_period(), 1);

        let high = client(10, ClientStatus::AtRisk);
        assert_eq!(high.unmatched_level(), UnmatchedLevel::High);
        assert_eq!(high.reminders_this_period(), 3);
        assert_eq!(high.unmatched_total(), 14);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("at-risk".parse::<ClientStatus>().unwrap(), ClientStatus::AtRisk);
        assert_eq!("quarterly".parse::<VatCadence>().unwrap(), VatCadence::Quarterly);
        assert!("sometimes".parse::<VatCadence>().is_err());
    }

    #[test]
    fn test_period_summary() {
        let period = VatPeriod::new("Q1 2026", 92, "10.04.", ClientStatus::OnTrack);
        assert_eq!(period.summary(), "Q1 2026 – 92% vollständig – Fällig am 10.04.");
    }
}
