// 💳 Konto-Vorgänge - the client's bank movements and missing receipts

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityLog, Notice, NoticeLevel};
use crate::entities::{MandantStatus, MandantTransaction};
use crate::error::{Error, Result};
use crate::filters::{MandantStatusFilter, MandantTransactionFilter, MonthFilter};
use crate::mock_data;

/// "+ Beleg" dialog state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDialog {
    pub transaction_id: String,
    pub filename: String,
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct MandantTransactionsPage {
    user_name: String,
    transactions: Vec<MandantTransaction>,
    pub filter: MandantTransactionFilter,
    upload_dialog: Option<UploadDialog>,
    activity: ActivityLog,
}

impl MandantTransactionsPage {
    /// `period` comes from the route query
    pub fn new(user_name: &str, period: Option<MonthFilter>) -> Self {
        Self {
            user_name: user_name.to_string(),
            transactions: mock_data::mandant_transactions(),
            filter: MandantTransactionFilter {
                period,
                ..Default::default()
            },
            upload_dialog: None,
            activity: ActivityLog::new(),
        }
    }

    pub fn transactions(&self) -> &[MandantTransaction] {
        &self.transactions
    }

    pub fn visible(&self) -> Vec<&MandantTransaction> {
        self.transactions
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&MandantTransaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut MandantTransaction> {
        self.transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TransactionNotFound(id.to_string()))
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn upload_dialog(&self) -> Option<&UploadDialog> {
        self.upload_dialog.as_ref()
    }

    // ========================================================================
    // FILTERS
    // ========================================================================

    pub fn period(&self) -> Option<&MonthFilter> {
        self.filter.period.as_ref()
    }

    /// "Filter aktiv: Februar 2024"
    pub fn period_label(&self) -> Option<String> {
        self.period().map(|p| format!("Filter aktiv: {}", p.label()))
    }

    pub fn remove_period_filter(&mut self) {
        self.filter.period = None;
    }

    pub fn set_status(&mut self, status: MandantStatusFilter) {
        self.filter.status = status;
    }

    pub fn cycle_status(&mut self) {
        self.filter.status = self.filter.status.next();
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
    }

    // ========================================================================
    // ROW ACTIONS
    // ========================================================================

    /// Open the "+ Beleg" dialog. Only open rows accept a receipt.
    pub fn open_upload_dialog(&mut self, id: &str) -> Result<bool> {
        let tx = self
            .find(id)
            .ok_or_else(|| Error::TransactionNotFound(id.to_string()))?;
        if !tx.is_open() {
            return Ok(false);
        }
        self.upload_dialog = Some(UploadDialog {
            transaction_id: id.to_string(),
            filename: String::new(),
            note: String::new(),
        });
        Ok(true)
    }

    pub fn set_upload_filename(&mut self, filename: &str) {
        if let Some(dialog) = self.upload_dialog.as_mut() {
            dialog.filename = filename.to_string();
        }
    }

    pub fn set_upload_note(&mut self, note: &str) {
        if let Some(dialog) = self.upload_dialog.as_mut() {
            dialog.note = note.to_string();
        }
    }

    pub fn cancel_upload(&mut self) {
        self.upload_dialog = None;
    }

    /// Confirm the open dialog
    pub fn confirm_upload(&mut self) -> Result<Option<&MandantTransaction>> {
        let dialog = match self.upload_dialog.take() {
            Some(dialog) => dialog,
            None => return Ok(None),
        };
        let filename = Some(dialog.filename.as_str());
        let note = Some(dialog.note.as_str());
        self.upload_receipt(&dialog.transaction_id, filename, note)
            .map(Some)
    }

    /// Hand in a receipt for one transaction: status becomes eingereicht,
    /// the file is attached and the note kept.
    pub fn upload_receipt(
        &mut self,
        id: &str,
        filename: Option<&str>,
        note: Option<&str>,
    ) -> Result<&MandantTransaction> {
        let actor = self.user_name.clone();
        let tx = self.find_mut(id)?;

        tx.status = MandantStatus::Eingereicht;
        if let Some(filename) = filename.map(str::trim).filter(|f| !f.is_empty()) {
            tx.attachments.push(filename.to_string());
        }
        if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
            tx.client_note = Some(note.to_string());
        }
        tracing::info!(transaction = id, attachments = tx.attachments.len(), "Receipt handed in");

        self.activity.record(
            Notice::new(NoticeLevel::Success, "receipt_uploaded", "Beleg hochgeladen", &actor)
                .with_detail("Der Beleg wurde erfolgreich an Ihre Kanzlei übermittelt."),
        );

        self.find(id)
            .ok_or_else(|| Error::TransactionNotFound(id.to_string()))
    }

    /// Returns the new flag value
    pub fn toggle_recurring(&mut self, id: &str) -> Result<bool> {
        let tx = self.find_mut(id)?;
        tx.is_recurring = !tx.is_recurring;
        Ok(tx.is_recurring)
    }

    /// Returns the new flag value
    pub fn toggle_notify_advisor(&mut self, id: &str) -> Result<bool> {
        let tx = self.find_mut(id)?;
        tx.notify_advisor = !tx.notify_advisor;
        Ok(tx.notify_advisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(period: Option<MonthFilter>) -> MandantTransactionsPage {
        MandantTransactionsPage::new("Muster-Mandant GmbH", period)
    }

    #[test]
    fn test_route_period_filter() {
        let mut page = page(Some(MonthFilter::new("Februar", 2024)));
        let ids: Vec<_> = page.visible().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(page.period_label().as_deref(), Some("Filter aktiv: Februar 2024"));

        page.remove_period_filter();
        assert_eq!(page.visible().len(), 5);
        assert!(page.period_label().is_none());
    }

    #[test]
    fn test_status_filter_cycle() {
        let mut page = page(None);
        page.cycle_status();
        assert_eq!(page.filter.status, MandantStatusFilter::Eingereicht);
        assert_eq!(page.visible().len(), 3);
        page.cycle_status();
        assert_eq!(page.visible().len(), 10);
    }

    #[test]
    fn test_upload_dialog_flow() {
        let mut page = page(None);
        assert!(!page.open_upload_dialog("2").unwrap());
        assert!(page.open_upload_dialog("7").unwrap());
        page.set_upload_filename("Tankbeleg.jpg");
        page.set_upload_note("Firmenwagen");

        let tx = page.confirm_upload().unwrap().unwrap();
        assert_eq!(tx.status, MandantStatus::Eingereicht);
        assert_eq!(tx.attachments, vec!["Tankbeleg.jpg"]);
        assert_eq!(tx.client_note.as_deref(), Some("Firmenwagen"));

        assert!(page.upload_dialog().is_none());
        assert_eq!(page.activity().latest().unwrap().title, "Beleg hochgeladen");
        // no longer open, so it drops out of the default view
        assert!(page.visible().iter().all(|t| t.id != "7"));
    }

    #[test]
    fn test_upload_without_file_or_note() {
        let mut page = page(None);
        let tx = page.upload_receipt("9", None, Some("  ")).unwrap();
        assert!(tx.attachments.is_empty());
        assert!(tx.client_note.is_none());
        assert!(page.upload_receipt("404", None, None).is_err());
    }

    #[test]
    fn test_toggle_flags() {
        let mut page = page(None);
        assert!(page.toggle_recurring("6").unwrap());
        assert!(!page.toggle_recurring("6").unwrap());
        assert!(page.toggle_notify_advisor("6").unwrap());
        assert!(page.toggle_notify_advisor("x").is_err());
    }
}
