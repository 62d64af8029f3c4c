// 🏢 Client list - the clerk's start page

use serde::{Deserialize, Serialize};

use crate::entities::{Client, ClientStatus, VatCadence};
use crate::error::{Error, Result};
use crate::filters::{ClientFilter, ClientSort};
use crate::mock_data;
use crate::routes::Route;

/// Totals shown above the client cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientListSummary {
    pub clients: usize,
    pub at_risk: usize,
    pub unmatched_transactions: u32,
    pub unmatched_receipts: u32,
}

#[derive(Debug, Clone)]
pub struct ClientListPage {
    clients: Vec<Client>,
    pub filter: ClientFilter,
    pub sort: ClientSort,
}

impl ClientListPage {
    pub fn new() -> Self {
        Self {
            clients: mock_data::clients(),
            filter: ClientFilter::default(),
            sort: ClientSort::default(),
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    /// Filtered and sorted view
    pub fn visible(&self) -> Vec<&Client> {
        let mut visible: Vec<&Client> = self
            .clients
            .iter()
            .filter(|c| self.filter.matches(c))
            .collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }

    pub fn summary(&self) -> ClientListSummary {
        ClientListSummary {
            clients: self.clients.len(),
            at_risk: self.clients.iter().filter(|c| c.is_at_risk()).count(),
            unmatched_transactions: self
                .clients
                .iter()
                .map(|c| c.unmatched_bank_transactions)
                .sum(),
            unmatched_receipts: self.clients.iter().map(|c| c.unmatched_receipts).sum(),
        }
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
    }

    pub fn set_status(&mut self, status: Option<ClientStatus>) {
        self.filter.status = status;
    }

    pub fn set_cadence(&mut self, cadence: Option<VatCadence>) {
        self.filter.cadence = cadence;
    }

    pub fn set_sort(&mut self, sort: ClientSort) {
        tracing::debug!(sort = sort.as_str(), "Client list sort changed");
        self.sort = sort;
    }

    /// all → on-track → at-risk → all
    pub fn cycle_status(&mut self) {
        self.filter.status = match self.filter.status {
            None => Some(ClientStatus::OnTrack),
            Some(ClientStatus::OnTrack) => Some(ClientStatus::AtRisk),
            Some(ClientStatus::AtRisk) => None,
        };
    }

    /// all → monthly → quarterly → all
    pub fn cycle_cadence(&mut self) {
        self.filter.cadence = match self.filter.cadence {
            None => Some(VatCadence::Monthly),
            Some(VatCadence::Monthly) => Some(VatCadence::Quarterly),
            Some(VatCadence::Quarterly) => None,
        };
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(self.sort.next());
    }

    /// "Open client" on a card
    pub fn open_client(&self, client_id: &str) -> Result<Route> {
        self.clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| Route::ClientDetail {
                client_id: c.id.clone(),
            })
            .ok_or_else(|| Error::ClientNotFound(client_id.to_string()))
    }
}

impl Default for ClientListPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_applies_filter_then_sort() {
        let mut page = ClientListPage::new();
        page.set_status(Some(ClientStatus::AtRisk));
        page.set_sort(ClientSort::MostUnmatched);

        let names: Vec<_> = page.visible().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Bauer & Co. KG", "Fischer Handels GmbH", "Müller GmbH"]
        );
    }

    #[test]
    fn test_default_sort_by_name() {
        let page = ClientListPage::new();
        let names: Vec<_> = page.visible().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names[0], "Alpha Design Studio");
        assert_eq!(names[5], "Schmidt Consulting");
    }

    #[test]
    fn test_summary() {
        let summary = ClientListPage::new().summary();
        assert_eq!(summary.clients, 6);
        assert_eq!(summary.at_risk, 3);
        assert_eq!(summary.unmatched_transactions, 79);
        assert_eq!(summary.unmatched_receipts, 43);
    }

    #[test]
    fn test_cycles_wrap_around() {
        let mut page = ClientListPage::new();
        page.cycle_status();
        page.cycle_status();
        assert_eq!(page.filter.status, Some(ClientStatus::AtRisk));
        page.cycle_status();
        assert_eq!(page.filter.status, None);

        page.cycle_cadence();
        assert_eq!(page.filter.cadence, Some(VatCadence::Monthly));
        assert_eq!(page.visible().len(), 4);
    }

    #[test]
    fn test_open_client() {
        let page = ClientListPage::new();
        assert_eq!(
            page.open_client("2").unwrap(),
            Route::ClientDetail { client_id: "2".to_string() }
        );
        assert!(page.open_client("99").unwrap_err().is_not_found());
    }
}
