// 📥 Inbox Item - open transactions aggregated across all clients

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::MatchStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxItem {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub status: MatchStatus,
    pub days_open: u32,
}

impl InboxItem {
    /// "1 day open", "12 days open"
    pub fn age_label(&self) -> String {
        let unit = if self.days_open == 1 { "day" } else { "days" };
        format!("{} {} open", self.days_open, unit)
    }

    /// Path of the matching page for this item's client
    pub fn matching_path(&self) -> String {
        format!("/clients/{}/matching", self.client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_label_pluralizes() {
        let mut item = InboxItem {
            id: "i1".to_string(),
            client_id: "3".to_string(),
            client_name: "Bauer & Co. KG".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 30).unwrap(),
            amount: 45.0,
            description: "PARKING GARAGE".to_string(),
            status: MatchStatus::Unmatched,
            days_open: 1,
        };
        assert_eq!(item.age_label(), "1 day open");

        item.days_open = 12;
        assert_eq!(item.age_label(), "12 days open");
        assert_eq!(item.matching_path(), "/clients/3/matching");
    }
}
