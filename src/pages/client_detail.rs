// 📋 Client detail - KPIs, open work shortcuts, risk & reminders

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::{Client, ClientStatus, UnmatchedLevel, VatPeriod};
use crate::error::{Error, Result};
use crate::mock_data;
use crate::routes::Route;

/// Reporting period picker in the page header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportingPeriod {
    #[default]
    March2026,
    February2026,
    January2026,
}

impl ReportingPeriod {
    pub const ALL: [ReportingPeriod; 3] = [
        ReportingPeriod::March2026,
        ReportingPeriod::February2026,
        ReportingPeriod::January2026,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingPeriod::March2026 => "march-2026",
            ReportingPeriod::February2026 => "february-2026",
            ReportingPeriod::January2026 => "january-2026",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportingPeriod::March2026 => "March 2026",
            ReportingPeriod::February2026 => "February 2026",
            ReportingPeriod::January2026 => "January 2026",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ReportingPeriod::March2026 => ReportingPeriod::February2026,
            ReportingPeriod::February2026 => ReportingPeriod::January2026,
            ReportingPeriod::January2026 => ReportingPeriod::March2026,
        }
    }
}

impl FromStr for ReportingPeriod {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ReportingPeriod::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::invalid("reporting period", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientKpis {
    pub bank_transactions: u32,
    pub unmatched_transactions: u32,
    pub unmatched_level: UnmatchedLevel,
    pub unmatched_receipts: u32,
    pub receipt_completeness: u8,
}

/// Right column of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskOverview {
    pub status: ClientStatus,
    pub status_label: String,
    /// Due date of the current VAT period
    pub vat_deadline: String,
    pub current_period: VatPeriod,
    pub next_period: VatPeriod,
    pub reminders_this_period: u32,
}

#[derive(Debug, Clone)]
pub struct ClientDetailPage {
    client: Client,
    period: ReportingPeriod,
}

impl ClientDetailPage {
    pub fn open(client_id: &str) -> Result<Self> {
        let client = mock_data::find_client(client_id)
            .ok_or_else(|| Error::ClientNotFound(client_id.to_string()))?;
        tracing::debug!(client = %client.name, "Opened client detail");
        Ok(Self {
            client,
            period: ReportingPeriod::default(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn period(&self) -> ReportingPeriod {
        self.period
    }

    pub fn select_period(&mut self, period: ReportingPeriod) {
        self.period = period;
    }

    pub fn cycle_period(&mut self) {
        self.period = self.period.next();
    }

    pub fn kpis(&self) -> ClientKpis {
        ClientKpis {
            bank_transactions: self.client.bank_transactions,
            unmatched_transactions: self.client.unmatched_bank_transactions,
            unmatched_level: self.client.unmatched_level(),
            unmatched_receipts: self.client.unmatched_receipts,
            receipt_completeness: self.client.receipt_completeness,
        }
    }

    pub fn overview(&self) -> RiskOverview {
        let status = self.client.status();
        RiskOverview {
            status,
            status_label: status.label().to_string(),
            vat_deadline: self.client.current_vat_period.due_date.clone(),
            current_period: self.client.current_vat_period.clone(),
            next_period: self.client.next_vat_period.clone(),
            reminders_this_period: self.client.reminders_this_period(),
        }
    }

    /// "Go to matching" shortcut
    pub fn matching_route(&self) -> Route {
        Route::Matching {
            client_id: self.client.id.clone(),
        }
    }

    pub fn back_route(&self) -> Route {
        Route::ClientList
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_unknown_client() {
        assert!(matches!(
            ClientDetailPage::open("42"),
            Err(Error::ClientNotFound(id)) if id == "42"
        ));
    }

    #[test]
    fn test_kpis_and_overview() {
        let page = ClientDetailPage::open("1").unwrap();
        let kpis = page.kpis();
        assert_eq!(kpis.bank_transactions, 125);
        assert_eq!(kpis.unmatched_level, UnmatchedLevel::High);

        let overview = page.overview();
        assert_eq!(overview.status, ClientStatus::AtRisk);
        assert_eq!(overview.vat_deadline, "10.04.");
        assert_eq!(overview.reminders_this_period, 3);
        assert_eq!(overview.next_period.label, "April 2026");
    }

    #[test]
    fn test_on_track_client() {
        let page = ClientDetailPage::open("4").unwrap();
        assert_eq!(page.kpis().unmatched_level, UnmatchedLevel::Low);
        assert_eq!(page.overview().status_label, "On track");
        assert_eq!(page.overview().reminders_this_period, 1);
    }

    #[test]
    fn test_period_picker_and_shortcuts() {
        let mut page = ClientDetailPage::open("3").unwrap();
        assert_eq!(page.period().label(), "March 2026");
        page.cycle_period();
        assert_eq!(page.period(), ReportingPeriod::February2026);
        page.select_period("january-2026".parse().unwrap());
        assert_eq!(page.period(), ReportingPeriod::January2026);

        assert_eq!(page.matching_route().to_path(), "/clients/3/matching");
        assert_eq!(page.back_route(), Route::ClientList);
    }
}
