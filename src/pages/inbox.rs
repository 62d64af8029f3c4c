// 📥 Inbox - open transactions across all clients

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{InboxItem, MatchStatus};
use crate::error::{Error, Result};
use crate::filters::{DateRange, InboxFilter};
use crate::mock_data;
use crate::routes::Route;

pub const EMPTY_MESSAGE: &str = "No items found matching your filters.";

/// KPI cards, always computed over the full list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxKpis {
    pub total_open: usize,
    pub unmatched: usize,
    pub waiting: usize,
}

/// Entry of the client dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct InboxPage {
    items: Vec<InboxItem>,
    clients: Vec<ClientOption>,
    reference_date: NaiveDate,
    pub filter: InboxFilter,
}

impl InboxPage {
    /// Date ranges are counted back from `reference_date`
    pub fn new(reference_date: NaiveDate) -> Self {
        let clients = mock_data::clients()
            .into_iter()
            .map(|c| ClientOption { id: c.id, name: c.name })
            .collect();

        Self {
            items: mock_data::inbox_items(),
            clients,
            reference_date,
            filter: InboxFilter::default(),
        }
    }

    pub fn items(&self) -> &[InboxItem] {
        &self.items
    }

    pub fn client_options(&self) -> &[ClientOption] {
        &self.clients
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn visible(&self) -> Vec<&InboxItem> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item, self.reference_date))
            .collect()
    }

    pub fn kpis(&self) -> InboxKpis {
        let with_status = |status: MatchStatus| {
            self.items.iter().filter(|i| i.status == status).count()
        };
        InboxKpis {
            total_open: self.items.iter().filter(|i| i.status.is_open()).count(),
            unmatched: with_status(MatchStatus::Unmatched),
            waiting: with_status(MatchStatus::Waiting),
        }
    }

    /// Empty-state text when the filters hide everything
    pub fn empty_message(&self) -> Option<&'static str> {
        self.visible().is_empty().then_some(EMPTY_MESSAGE)
    }

    pub fn set_client(&mut self, client_id: Option<String>) {
        self.filter.client_id = client_id;
    }

    pub fn set_status(&mut self, status: Option<MatchStatus>) {
        self.filter.status = status;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.filter.date_range = range;
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
    }

    /// all → each client in list order → all
    pub fn cycle_client(&mut self) {
        let next = match &self.filter.client_id {
            None => self.clients.first(),
            Some(current) => self
                .clients
                .iter()
                .position(|c| &c.id == current)
                .and_then(|i| self.clients.get(i + 1)),
        };
        self.filter.client_id = next.map(|c| c.id.clone());
    }

    pub fn cycle_status(&mut self) {
        self.filter.status = match self.filter.status {
            None => Some(MatchStatus::ALL[0]),
            Some(current) => MatchStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| MatchStatus::ALL.get(i + 1).copied()),
        };
    }

    pub fn cycle_date_range(&mut self) {
        self.filter.date_range = self.filter.date_range.next();
    }

    pub fn client_filter_label(&self) -> String {
        match &self.filter.client_id {
            None => "All clients".to_string(),
            Some(id) => self
                .clients
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.clone()),
        }
    }

    /// "Open matching" on a row
    pub fn open_matching(&self, item_id: &str) -> Result<Route> {
        let item = self
            .items
            .iter()
            .find(|i| i.id == item_id)
            .ok_or_else(|| Error::TransactionNotFound(item_id.to_string()))?;
        tracing::debug!(item = item_id, client = %item.client_id, "Inbox → matching");
        Ok(Route::Matching {
            client_id: item.client_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> InboxPage {
        InboxPage::new(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap())
    }

    #[test]
    fn test_kpis_over_full_list() {
        let mut page = page();
        let before = page.kpis();
        assert_eq!(
            before,
            InboxKpis {
                total_open: 12,
                unmatched: 6,
                waiting: 3
            }
        );

        page.set_client(Some("4".to_string()));
        assert_eq!(page.kpis(), before);
    }

    #[test]
    fn test_default_shows_every_item() {
        let page = page();
        assert_eq!(page.filter.date_range, DateRange::All);
        assert_eq!(page.visible().len(), 13);
        assert!(page.empty_message().is_none());

        // the view does not depend on the anchor date unless a range is picked
        let later = InboxPage::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(later.visible().len(), 13);
    }

    #[test]
    fn test_date_range_cycle_narrows_and_returns_to_all() {
        let mut page = page();
        page.cycle_date_range();
        assert_eq!(page.filter.date_range, DateRange::ThisMonth);
        assert_eq!(page.visible().len(), 10);
        page.cycle_date_range();
        assert_eq!(page.visible().len(), 2);
        page.cycle_date_range();
        page.cycle_date_range();
        assert_eq!(page.filter.date_range, DateRange::All);
        assert_eq!(page.visible().len(), 13);
    }

    #[test]
    fn test_status_filter_returns_only_that_status() {
        let mut page = page();
        page.set_date_range(DateRange::LastThreeMonths);
        page.set_status(Some(MatchStatus::Waiting));
        let visible = page.visible();
        assert_eq!(visible.len(), 3);
        assert!(visible.iter().all(|i| i.status == MatchStatus::Waiting));
    }

    #[test]
    fn test_empty_state() {
        let mut page = page();
        page.set_search("does not exist");
        assert_eq!(page.empty_message(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn test_cycle_client() {
        let mut page = page();
        page.cycle_client();
        assert_eq!(page.client_filter_label(), "Müller GmbH");
        for _ in 0..6 {
            page.cycle_client();
        }
        assert_eq!(page.filter.client_id, None);
        assert_eq!(page.client_filter_label(), "All clients");
    }

    #[test]
    fn test_open_matching_navigates_to_client() {
        let page = page();
        assert_eq!(
            page.open_matching("i7").unwrap(),
            Route::Matching { client_id: "6".to_string() }
        );
        assert!(page.open_matching("nope").is_err());
    }
}
