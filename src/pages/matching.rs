// 🔗 Matching - bank transactions against receipts for one client
//
// The page owns a private copy of the transaction list. Status changes,
// selections and requests live only as long as the page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityLog, Notice, NoticeLevel};
use crate::entities::{Client, MatchStatus, Transaction};
use crate::error::{Error, Result};
use crate::filters::TransactionFilter;
use crate::mock_data;
use crate::requests::{self, ReceiptRequest};
use crate::routes::Route;
use crate::selection::Selection;

/// Transaction selected when the page opens
pub const DEFAULT_SELECTED: &str = "t3";

/// Open "request receipts" dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDialog {
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct MatchingPage {
    client: Client,
    clerk: String,
    transactions: Vec<Transaction>,
    pub filter: TransactionFilter,
    selection: Selection,
    selected_id: Option<String>,
    request_dialog: Option<RequestDialog>,
    activity: ActivityLog,
}

impl MatchingPage {
    pub fn open(client_id: &str, clerk: &str) -> Result<Self> {
        let client = mock_data::find_client(client_id)
            .ok_or_else(|| Error::ClientNotFound(client_id.to_string()))?;
        let transactions = mock_data::transactions_for(client_id);

        let selected_id = transactions
            .iter()
            .find(|t| t.id == DEFAULT_SELECTED)
            .or_else(|| transactions.first())
            .map(|t| t.id.clone());

        tracing::debug!(client = %client.name, transactions = transactions.len(), "Opened matching");

        Ok(Self {
            client,
            clerk: clerk.to_string(),
            transactions,
            filter: TransactionFilter::default(),
            selection: Selection::new(),
            selected_id,
            request_dialog: None,
            activity: ActivityLog::new(),
        })
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn visible(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.status == MatchStatus::Matched)
            .count()
    }

    pub fn waiting_count(&self) -> usize {
        requests::waiting_count(&self.transactions)
    }

    /// "4 of 15 transactions matched"
    pub fn progress_label(&self) -> String {
        format!(
            "{} of {} transactions matched",
            self.matched_count(),
            self.transactions.len()
        )
    }

    pub fn selected(&self) -> Option<&Transaction> {
        let id = self.selected_id.as_deref()?;
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn request_dialog(&self) -> Option<&RequestDialog> {
        self.request_dialog.as_ref()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn back_route(&self) -> Route {
        Route::ClientDetail {
            client_id: self.client.id.clone(),
        }
    }

    // ========================================================================
    // FILTERS
    // ========================================================================

    pub fn set_status_filter(&mut self, status: Option<MatchStatus>) {
        self.filter.status = status;
    }

    /// all → unmatched → suggestion → matched → waiting → all
    pub fn cycle_status_filter(&mut self) {
        self.filter.status = match self.filter.status {
            None => Some(MatchStatus::ALL[0]),
            Some(current) => MatchStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| MatchStatus::ALL.get(i + 1).copied()),
        };
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Show a transaction in the detail panel
    pub fn select_transaction(&mut self, id: &str) -> Result<()> {
        if !self.transactions.iter().any(|t| t.id == id) {
            return Err(Error::TransactionNotFound(id.to_string()));
        }
        self.selected_id = Some(id.to_string());
        Ok(())
    }

    /// Checkbox on a row
    pub fn toggle_row(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    /// Header checkbox over the filtered rows
    pub fn toggle_all_visible(&mut self) {
        let visible: Vec<String> = self.visible().iter().map(|t| t.id.clone()).collect();
        self.selection.toggle_all(visible.iter().map(String::as_str));
    }

    pub fn all_visible_selected(&self) -> bool {
        self.selection
            .covers(self.visible().into_iter().map(|t| t.id.as_str()))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ========================================================================
    // DETAIL ACTIONS
    // ========================================================================

    fn selected_mut(&mut self) -> Result<&mut Transaction> {
        let id = self
            .selected_id
            .clone()
            .ok_or_else(|| Error::TransactionNotFound(String::new()))?;
        self.transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::TransactionNotFound(id))
    }

    fn notify(&mut self, level: NoticeLevel, kind: &str, title: &str, detail: String) {
        let notice = Notice::new(level, kind, title, &self.clerk).with_detail(detail);
        self.activity.record(notice);
    }

    /// Confirm the suggested receipt. Returns false when the transaction has none.
    pub fn confirm_match(&mut self) -> Result<bool> {
        let tx = self.selected_mut()?;
        if !tx.confirm_match() {
            return Ok(false);
        }
        let detail = format!("{} matched", tx.description);
        tracing::info!(transaction = %tx.id, "Confirmed match");
        self.notify(NoticeLevel::Success, "match_confirmed", "Match confirmed", detail);
        Ok(true)
    }

    /// Replace the suggestion with another available receipt
    pub fn choose_receipt(&mut self, receipt_id: &str) -> Result<()> {
        let tx = self.selected_mut()?;
        tx.choose_receipt(receipt_id)?;
        let detail = format!("{} suggested for {}", receipt_id, tx.description);
        self.notify(NoticeLevel::Info, "receipt_changed", "Receipt changed", detail);
        Ok(())
    }

    pub fn mark_cash_payment(&mut self) -> Result<()> {
        let tx = self.selected_mut()?;
        tx.mark_cash_payment();
        let detail = format!("{} marked as cash payment", tx.description);
        self.notify(NoticeLevel::Success, "cash_payment", "Transaction resolved", detail);
        Ok(())
    }

    pub fn mark_not_relevant(&mut self) -> Result<()> {
        let tx = self.selected_mut()?;
        tx.mark_not_relevant();
        let detail = format!("{} marked as not relevant", tx.description);
        self.notify(NoticeLevel::Success, "not_relevant", "Transaction resolved", detail);
        Ok(())
    }

    // ========================================================================
    // RECEIPT REQUESTS
    // ========================================================================

    /// Opens the dialog. Refused while nothing is selected.
    pub fn open_request_dialog(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.request_dialog = Some(RequestDialog::default());
        true
    }

    pub fn set_request_note(&mut self, note: &str) {
        if let Some(dialog) = self.request_dialog.as_mut() {
            dialog.note = note.to_string();
        }
    }

    pub fn cancel_request_dialog(&mut self) {
        self.request_dialog = None;
    }

    /// Confirm the open dialog with its note
    pub fn confirm_request_dialog(&mut self, now: DateTime<Utc>) -> Option<ReceiptRequest> {
        let dialog = self.request_dialog.take()?;
        self.request_receipts(Some(&dialog.note), now)
    }

    /// Flip the selected transactions to waiting and clear the selection
    pub fn request_receipts(
        &mut self,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<ReceiptRequest> {
        let request = requests::request_receipts(
            &mut self.transactions,
            &self.selection,
            &self.client.name,
            &self.clerk,
            note,
            now,
        )?;

        self.selection.clear();
        self.notify(
            NoticeLevel::Success,
            "receipts_requested",
            "Request sent",
            format!(
                "{} transactions are now waiting for {}",
                request.count(),
                self.client.name
            ),
        );
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MatchingPage {
        MatchingPage::open("1", "Sabine Kramer").unwrap()
    }

    #[test]
    fn test_open_defaults() {
        let page = page();
        assert_eq!(page.selected().unwrap().id, "t3");
        assert_eq!(page.progress_label(), "4 of 15 transactions matched");
        assert_eq!(page.waiting_count(), 0);
        assert_eq!(page.visible().len(), 15);
        assert!(MatchingPage::open("x", "Sabine Kramer").is_err());
    }

    #[test]
    fn test_status_filter_cycle() {
        let mut page = page();
        page.cycle_status_filter();
        assert_eq!(page.filter.status, Some(MatchStatus::Unmatched));
        assert_eq!(page.visible().len(), 6);
        for _ in 0..4 {
            page.cycle_status_filter();
        }
        assert_eq!(page.filter.status, None);
    }

    #[test]
    fn test_select_all_visible_then_clear() {
        let mut page = page();
        page.set_status_filter(Some(MatchStatus::Unmatched));
        page.toggle_all_visible();

        let selected: Vec<_> = page.selection().ids().map(str::to_string).collect();
        let visible: Vec<_> = page.visible().iter().map(|t| t.id.clone()).collect();
        let mut visible_sorted = visible.clone();
        visible_sorted.sort();
        assert_eq!(selected, visible_sorted);
        assert!(page.all_visible_selected());

        page.toggle_all_visible();
        assert!(page.selection().is_empty());
    }

    #[test]
    fn test_request_dialog_flow() {
        let mut page = page();
        assert!(!page.open_request_dialog());

        page.toggle_row("t2");
        page.toggle_row("t14");
        assert!(page.open_request_dialog());
        page.set_request_note("Danke!");

        let request = page.confirm_request_dialog(Utc::now()).unwrap();
        assert_eq!(request.transaction_ids, vec!["t2", "t14"]);
        assert!(request.request.message.contains("Danke!"));
        assert!(page.selection().is_empty());
        assert!(page.request_dialog().is_none());

        let waiting: Vec<_> = page
            .transactions()
            .iter()
            .filter(|t| t.status == MatchStatus::Waiting)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(waiting, vec!["t2", "t14"]);
        assert_eq!(page.waiting_count(), 2);
        assert_eq!(page.activity().latest().unwrap().kind, "receipts_requested");
    }

    #[test]
    fn test_detail_actions() {
        let mut page = page();
        assert!(page.confirm_match().unwrap());
        assert_eq!(page.selected().unwrap().status, MatchStatus::Matched);
        assert_eq!(page.matched_count(), 5);

        page.select_transaction("t2").unwrap();
        assert!(!page.confirm_match().unwrap());
        page.mark_cash_payment().unwrap();
        assert_eq!(page.selected().unwrap().status, MatchStatus::Matched);

        page.select_transaction("t4").unwrap();
        page.choose_receipt("r5").unwrap();
        assert_eq!(
            page.selected().unwrap().suggested_receipt.as_ref().unwrap().id,
            "r5"
        );

        page.select_transaction("t5").unwrap();
        page.mark_not_relevant().unwrap();
        assert_eq!(page.matched_count(), 7);

        assert!(page.select_transaction("t99").is_err());
        assert_eq!(page.activity().len(), 4);
    }
}
