// 🗂️ Belege - the client's receipts with their review state

use crate::entities::MandantReceipt;
use crate::error::{Error, Result};
use crate::filters::{ReceiptFilter, ReceiptListFilter};
use crate::mock_data;
use crate::routes::Route;

#[derive(Debug, Clone)]
pub struct MandantReceiptsPage {
    receipts: Vec<MandantReceipt>,
    pub filter: ReceiptListFilter,
    details: Option<String>,
}

impl MandantReceiptsPage {
    pub fn new() -> Self {
        Self {
            receipts: mock_data::mandant_receipts(),
            filter: ReceiptListFilter::default(),
            details: None,
        }
    }

    pub fn receipts(&self) -> &[MandantReceipt] {
        &self.receipts
    }

    pub fn visible(&self) -> Vec<&MandantReceipt> {
        self.receipts
            .iter()
            .filter(|r| self.filter.matches(r))
            .collect()
    }

    pub fn set_status(&mut self, status: ReceiptFilter) {
        self.filter.status = status;
    }

    pub fn cycle_status(&mut self) {
        self.filter.status = self.filter.status.next();
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
    }

    pub fn open_details(&mut self, receipt_id: &str) -> Result<()> {
        if !self.receipts.iter().any(|r| r.id == receipt_id) {
            return Err(Error::ReceiptNotFound(receipt_id.to_string()));
        }
        self.details = Some(receipt_id.to_string());
        Ok(())
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    pub fn details(&self) -> Option<&MandantReceipt> {
        let id = self.details.as_deref()?;
        self.receipts.iter().find(|r| r.id == id)
    }

    /// Jump to the transactions page. Only linked receipts offer it.
    pub fn open_linked_transaction(&mut self) -> Option<Route> {
        if !self.details()?.is_linked() {
            return None;
        }
        self.details = None;
        Some(Route::MandantTransactions { period: None })
    }
}

impl Default for MandantReceiptsPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ReceiptReviewState;

    #[test]
    fn test_filter_and_search() {
        let mut page = MandantReceiptsPage::new();
        page.set_status(ReceiptFilter::OhneZuordnung);
        let ids: Vec<_> = page.visible().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r4", "r6"]);

        page.set_status(ReceiptFilter::All);
        page.set_search("hotel");
        let ids: Vec<_> = page.visible().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2"]);
    }

    #[test]
    fn test_review_states_in_dataset() {
        let page = MandantReceiptsPage::new();
        let states: Vec<_> = page.receipts().iter().map(|r| r.review_state()).collect();
        assert_eq!(states[1], ReceiptReviewState::Done);
        assert_eq!(states[2], ReceiptReviewState::InReview);
        assert_eq!(states[3], ReceiptReviewState::Unassigned);
    }

    #[test]
    fn test_linked_navigation() {
        let mut page = MandantReceiptsPage::new();
        page.open_details("r4").unwrap();
        assert!(page.open_linked_transaction().is_none());

        page.open_details("r1").unwrap();
        assert_eq!(
            page.open_linked_transaction(),
            Some(Route::MandantTransactions { period: None })
        );
        assert!(page.details().is_none());
    }
}
