// 📤 Beleg-Upload - simulated multi-file upload
//
// Files are never read. Each accepted name becomes a new receipt at the top
// of the page's list.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityLog, Notice, NoticeLevel};
use crate::entities::{MandantReceipt, ReceiptStatus};
use crate::error::{Error, Result};
use crate::mock_data;
use crate::routes::Route;

pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// Extension check, case-insensitive
pub fn is_supported(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub added: Vec<MandantReceipt>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MandantUploadPage {
    user_name: String,
    receipts: Vec<MandantReceipt>,
    details: Option<String>,
    activity: ActivityLog,
}

impl MandantUploadPage {
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            receipts: mock_data::mandant_receipts(),
            details: None,
            activity: ActivityLog::new(),
        }
    }

    pub fn receipts(&self) -> &[MandantReceipt] {
        &self.receipts
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Add the accepted files as new receipts, newest first.
    ///
    /// Ids continue from the current list length: with 7 receipts the next
    /// two files become `r8` and `r9`.
    pub fn upload_files<'a, I>(&mut self, filenames: I, uploaded_at: NaiveDateTime) -> UploadOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (accepted, skipped): (Vec<&str>, Vec<&str>) = filenames
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .partition(|name| is_supported(name));

        let existing = self.receipts.len();
        let added: Vec<MandantReceipt> = accepted
            .iter()
            .enumerate()
            .map(|(idx, filename)| MandantReceipt {
                id: format!("r{}", existing + idx + 1),
                filename: filename.to_string(),
                uploaded_at,
                amount: None,
                status: ReceiptStatus::Neu,
                linked_transaction: None,
            })
            .collect();

        let mut receipts = added.clone();
        receipts.append(&mut self.receipts);
        self.receipts = receipts;

        if !added.is_empty() {
            self.activity.record(
                Notice::new(NoticeLevel::Success, "receipts_uploaded", "Belege hochgeladen", &self.user_name)
                    .with_detail(format!(
                        "{} Datei(en) wurden erfolgreich hochgeladen.",
                        added.len()
                    )),
            );
        }
        if !skipped.is_empty() {
            tracing::warn!(skipped = ?skipped, "Skipped unsupported files");
            self.activity.record(
                Notice::new(NoticeLevel::Warning, "files_skipped", "Dateien übersprungen", &self.user_name)
                    .with_detail(format!(
                        "Nicht unterstützt (PDF, JPG, PNG): {}",
                        skipped.join(", ")
                    )),
            );
        }

        UploadOutcome {
            added,
            skipped: skipped.into_iter().map(str::to_string).collect(),
        }
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

    /// "Zu den Konto-Vorgängen" in the details panel
    pub fn transactions_route(&mut self) -> Route {
        self.details = None;
        Route::MandantTransactions { period: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported("Rechnung.PDF"));
        assert!(is_supported("foto.jpeg"));
        assert!(is_supported("scan.Png"));
        assert!(!is_supported("tabelle.xlsx"));
        assert!(!is_supported("pdf"));
    }

    #[test]
    fn test_upload_prepends_with_sequential_ids() {
        let mut page = MandantUploadPage::new("Muster-Mandant GmbH");
        let outcome = page.upload_files(["a.pdf", "notes.txt", "b.JPG"], now());

        assert_eq!(outcome.skipped, vec!["notes.txt"]);
        let ids: Vec<_> = outcome.added.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r8", "r9"]);

        let front: Vec<_> = page.receipts().iter().take(3).map(|r| r.filename.as_str()).collect();
        assert_eq!(front, vec!["a.pdf", "b.JPG", "Rechnung_Bürobedarf_Express.pdf"]);
        assert_eq!(page.receipts().len(), 9);
        assert!(page.receipts()[0].status == ReceiptStatus::Neu);
        assert_eq!(page.activity().len(), 2);
    }

    #[test]
    fn test_upload_nothing_supported() {
        let mut page = MandantUploadPage::new("Muster-Mandant GmbH");
        let outcome = page.upload_files(["a.docx"], now());
        assert!(outcome.added.is_empty());
        assert_eq!(page.receipts().len(), 7);
        assert_eq!(page.activity().latest().unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn test_details_panel() {
        let mut page = MandantUploadPage::new("Muster-Mandant GmbH");
        page.open_details("r3").unwrap();
        assert_eq!(page.details().unwrap().filename, "Tankbeleg_Shell_März.jpg");
        assert_eq!(
            page.transactions_route(),
            Route::MandantTransactions { period: None }
        );
        assert!(page.details().is_none());
        assert!(page.open_details("r42").is_err());
    }
}
