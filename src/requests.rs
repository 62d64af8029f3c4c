// ✉️ Receipt requests - templated message to the client, selected rows flip to waiting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ClientRequest, MatchStatus, Transaction};
use crate::format;
use crate::selection::Selection;

/// Result of one "request receipts" action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRequest {
    pub request: ClientRequest,
    pub client_name: String,
    pub transaction_ids: Vec<String>,
}

impl ReceiptRequest {
    pub fn count(&self) -> usize {
        self.transaction_ids.len()
    }
}

/// German request text listing date, description and amount of every transaction
pub fn compose_message(
    client_name: &str,
    clerk: &str,
    transactions: &[&Transaction],
    note: Option<&str>,
) -> String {
    let mut lines = vec![
        format!("Guten Tag {},", client_name),
        String::new(),
        "für die folgenden Kontobewegungen fehlen uns noch Belege:".to_string(),
        String::new(),
    ];

    for tx in transactions {
        lines.push(format!(
            "- {} | {} | {}",
            format::date_de(tx.date),
            tx.description,
            format::euro_de(tx.amount)
        ));
    }

    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(String::new());
        lines.push(note.to_string());
    }

    lines.push(String::new());
    lines.push("Bitte laden Sie die Belege im Mandantenportal hoch.".to_string());
    lines.push(String::new());
    lines.push("Mit freundlichen Grüßen".to_string());
    lines.push(clerk.to_string());

    lines.join("\n")
}

/// Flip the selected transactions to waiting and attach one shared request.
///
/// Unselected transactions are left untouched. Returns `None` when nothing is
/// selected.
pub fn request_receipts(
    transactions: &mut [Transaction],
    selection: &Selection,
    client_name: &str,
    clerk: &str,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> Option<ReceiptRequest> {
    if selection.is_empty() {
        return None;
    }

    let selected: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| selection.contains(&tx.id))
        .collect();
    if selected.is_empty() {
        return None;
    }

    let message = compose_message(client_name, clerk, &selected, note);
    let transaction_ids: Vec<String> = selected.iter().map(|tx| tx.id.clone()).collect();

    let request = ClientRequest {
        id: uuid::Uuid::new_v4().to_string(),
        requested_at: now,
        message,
    };

    for tx in transactions.iter_mut().filter(|tx| selection.contains(&tx.id)) {
        tx.mark_waiting(request.clone());
    }

    tracing::info!(
        client = client_name,
        count = transaction_ids.len(),
        "Requested receipts from client"
    );

    Some(ReceiptRequest {
        request,
        client_name: client_name.to_string(),
        transaction_ids,
    })
}

/// Number of transactions currently waiting for the client
pub fn waiting_count(transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .filter(|tx| tx.status == MatchStatus::Waiting)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;

    #[test]
    fn test_request_flips_only_selected() {
        let mut transactions = mock_data::transactions();
        let before = transactions.clone();

        let mut selection = Selection::new();
        selection.toggle("t2");
        selection.toggle("t5");
        selection.toggle("t11");

        let result = request_receipts(
            &mut transactions,
            &selection,
            "Müller GmbH",
            "Sabine Kramer",
            None,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(result.count(), 3);
        assert_eq!(waiting_count(&transactions), 3);

        for (tx, old) in transactions.iter().zip(before.iter()) {
            if selection.contains(&tx.id) {
                assert_eq!(tx.status, MatchStatus::Waiting);
                assert_eq!(tx.request.as_ref().unwrap().message, result.request.message);
            } else {
                assert_eq!(tx, old);
            }
        }
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut transactions = mock_data::transactions();
        let before = transactions.clone();

        let result = request_receipts(
            &mut transactions,
            &Selection::new(),
            "Müller GmbH",
            "Sabine Kramer",
            None,
            Utc::now(),
        );

        assert!(result.is_none());
        assert_eq!(transactions, before);
    }

    #[test]
    fn test_message_lists_transactions_and_note() {
        let transactions = mock_data::transactions();
        let selected = vec![&transactions[1], &transactions[4]];

        let message = compose_message(
            "Müller GmbH",
            "Sabine Kramer",
            &selected,
            Some("Bitte bis Freitag."),
        );

        assert!(message.starts_with("Guten Tag Müller GmbH,"));
        assert!(message.contains("- 08.03.2026 | CLIENT PAYMENT - INV 2024-045 | 1.500,00 €"));
        assert!(message.contains("- 14.03.2026 | RENT - OFFICE SPACE | 320,00 €"));
        assert!(message.contains("Bitte bis Freitag."));
        assert!(message.ends_with("Sabine Kramer"));
    }

    #[test]
    fn test_blank_note_is_omitted() {
        let transactions = mock_data::transactions();
        let with_blank = compose_message("X", "Y", &[&transactions[1]], Some("   "));
        let without = compose_message("X", "Y", &[&transactions[1]], None);
        assert_eq!(with_blank, without);
    }
}
