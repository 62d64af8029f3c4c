// 🔍 List filtering - predicate conjunctions and sort orders
//
// Every listing page keeps one of these criteria structs in its local state
// and recomputes its visible rows through `matches` on every read. All
// criteria of a struct are ANDed; `None` means "all".

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::entities::{
    Client, ClientStatus, InboxItem, MandantReceipt, MandantStatus, MandantTransaction,
    MatchStatus, ReceiptStatus, Transaction, VatCadence,
};
use crate::error::Error;
use crate::format;

/// Case-insensitive substring match. An empty query matches everything.
pub fn contains_ci(haystack: &str, query: &str) -> bool {
    query.is_empty() || haystack.to_lowercase().contains(&query.to_lowercase())
}

/// Parse an optional "all"-able filter value
pub fn parse_optional<T: FromStr<Err = Error>>(value: &str) -> Result<Option<T>, Error> {
    match value {
        "" | "all" => Ok(None),
        other => other.parse().map(Some),
    }
}

fn status_matches<T: PartialEq>(wanted: Option<T>, actual: T) -> bool {
    wanted.map_or(true, |w| w == actual)
}

// ============================================================================
// CLIENT LIST
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
    pub cadence: Option<VatCadence>,
    pub search: String,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        status_matches(self.status, client.status())
            && status_matches(self.cadence, client.vat_cadence)
            && contains_ci(&client.name, &self.search)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientSort {
    #[default]
    Name,
    /// Descending by unmatched transactions + unmatched receipts
    MostUnmatched,
    /// Lowest receipt completeness first
    Completeness,
}

impl ClientSort {
    pub const ALL: [ClientSort; 3] = [
        ClientSort::Name,
        ClientSort::MostUnmatched,
        ClientSort::Completeness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientSort::Name => "name",
            ClientSort::MostUnmatched => "most-unmatched",
            ClientSort::Completeness => "completeness",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientSort::Name => "Name",
            ClientSort::MostUnmatched => "Most unmatched",
            ClientSort::Completeness => "Lowest completeness",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ClientSort::Name => ClientSort::MostUnmatched,
            ClientSort::MostUnmatched => ClientSort::Completeness,
            ClientSort::Completeness => ClientSort::Name,
        }
    }

    pub fn compare(&self, a: &Client, b: &Client) -> Ordering {
        let by_name = a.name.cmp(&b.name);
        match self {
            ClientSort::Name => by_name,
            ClientSort::MostUnmatched => b
                .unmatched_total()
                .cmp(&a.unmatched_total())
                .then(by_name),
            ClientSort::Completeness => a
                .receipt_completeness
                .cmp(&b.receipt_completeness)
                .then(by_name),
        }
    }

    pub fn apply(&self, clients: &mut [Client]) {
        clients.sort_by(|a, b| self.compare(a, b));
    }
}

impl FromStr for ClientSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientSort::ALL
            .iter()
            .copied()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| Error::invalid("client sort", s))
    }
}

// ============================================================================
// MATCHING
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub status: Option<MatchStatus>,
    pub search: String,
}

impl TransactionFilter {
    /// Search hits the description (case-insensitive) or the amount as typed
    pub fn matches(&self, tx: &Transaction) -> bool {
        status_matches(self.status, tx.status)
            && (contains_ci(&tx.description, &self.search)
                || tx.amount_text().contains(self.search.trim()))
    }
}

// ============================================================================
// INBOX
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    /// No date restriction
    #[default]
    All,
    ThisMonth,
    LastMonth,
    LastThreeMonths,
}

impl DateRange {
    pub const ALL: [DateRange; 4] = [
        DateRange::All,
        DateRange::ThisMonth,
        DateRange::LastMonth,
        DateRange::LastThreeMonths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::ThisMonth => "this-month",
            DateRange::LastMonth => "last-month",
            DateRange::LastThreeMonths => "last-3-months",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::All => "All dates",
            DateRange::ThisMonth => "This month",
            DateRange::LastMonth => "Last month",
            DateRange::LastThreeMonths => "Last 3 months",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DateRange::All => DateRange::ThisMonth,
            DateRange::ThisMonth => DateRange::LastMonth,
            DateRange::LastMonth => DateRange::LastThreeMonths,
            DateRange::LastThreeMonths => DateRange::All,
        }
    }

    /// Inclusive bounds of the range, counted in calendar months back from
    /// `reference`. `None` for the unbounded range.
    pub fn bounds(&self, reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let first_of_month = reference.with_day(1).unwrap_or(reference);
        let months_back = |n: u32| {
            first_of_month
                .checked_sub_months(Months::new(n))
                .unwrap_or(first_of_month)
        };
        let end_of_previous = first_of_month.pred_opt().unwrap_or(first_of_month);

        match self {
            DateRange::All => None,
            DateRange::ThisMonth => Some((first_of_month, reference)),
            DateRange::LastMonth => Some((months_back(1), end_of_previous)),
            DateRange::LastThreeMonths => Some((months_back(2), reference)),
        }
    }

    pub fn contains(&self, date: NaiveDate, reference: NaiveDate) -> bool {
        match self.bounds(reference) {
            Some((from, to)) => date >= from && date <= to,
            None => true,
        }
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateRange::ALL
            .iter()
            .copied()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| Error::invalid("date range", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboxFilter {
    pub client_id: Option<String>,
    pub status: Option<MatchStatus>,
    pub date_range: DateRange,
    pub search: String,
}

impl InboxFilter {
    pub fn matches(&self, item: &InboxItem, reference: NaiveDate) -> bool {
        let client_ok = self
            .client_id
            .as_deref()
            .map_or(true, |id| id == item.client_id);

        client_ok
            && status_matches(self.status, item.status)
            && self.date_range.contains(item.date, reference)
            && (contains_ci(&item.client_name, &self.search)
                || contains_ci(&item.description, &self.search))
    }
}

// ============================================================================
// MANDANT TRANSACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MandantStatusFilter {
    /// Only rows still missing a receipt
    #[default]
    Open,
    Eingereicht,
    All,
}

impl MandantStatusFilter {
    pub const ALL: [MandantStatusFilter; 3] = [
        MandantStatusFilter::Open,
        MandantStatusFilter::Eingereicht,
        MandantStatusFilter::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MandantStatusFilter::Open => "open",
            MandantStatusFilter::Eingereicht => "eingereicht",
            MandantStatusFilter::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MandantStatusFilter::Open => "Nur offene",
            MandantStatusFilter::Eingereicht => "Eingereichte",
            MandantStatusFilter::All => "Alle",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            MandantStatusFilter::Open => MandantStatusFilter::Eingereicht,
            MandantStatusFilter::Eingereicht => MandantStatusFilter::All,
            MandantStatusFilter::All => MandantStatusFilter::Open,
        }
    }

    fn matches(&self, status: MandantStatus) -> bool {
        match self {
            MandantStatusFilter::Open => status == MandantStatus::Offen,
            MandantStatusFilter::Eingereicht => status == MandantStatus::Eingereicht,
            MandantStatusFilter::All => true,
        }
    }
}

impl FromStr for MandantStatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MandantStatusFilter::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::invalid("mandant status filter", s))
    }
}

/// Booking period selected from the dashboard ("Februar 2024")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthFilter {
    pub month: String,
    pub year: i32,
}

impl MonthFilter {
    pub fn new(month: &str, year: i32) -> Self {
        MonthFilter {
            month: month.to_string(),
            year,
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MandantTransactionFilter {
    pub period: Option<MonthFilter>,
    pub status: MandantStatusFilter,
    pub search: String,
}

impl MandantTransactionFilter {
    pub fn matches(&self, tx: &MandantTransaction) -> bool {
        let period_ok = self
            .period
            .as_ref()
            .map_or(true, |p| tx.in_period(&p.month, p.year));

        period_ok
            && self.status.matches(tx.status)
            && (contains_ci(&tx.recipient, &self.search)
                || contains_ci(&tx.description, &self.search))
    }
}

// ============================================================================
// MANDANT RECEIPTS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceiptFilter {
    #[default]
    All,
    /// No linked transaction
    OhneZuordnung,
    /// Has a linked transaction
    Zugeordnet,
    Verarbeitet,
}

impl ReceiptFilter {
    pub const ALL: [ReceiptFilter; 4] = [
        ReceiptFilter::All,
        ReceiptFilter::OhneZuordnung,
        ReceiptFilter::Zugeordnet,
        ReceiptFilter::Verarbeitet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptFilter::All => "all",
            ReceiptFilter::OhneZuordnung => "ohne-zuordnung",
            ReceiptFilter::Zugeordnet => "zugeordnet",
            ReceiptFilter::Verarbeitet => "verarbeitet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReceiptFilter::All => "Alle",
            ReceiptFilter::OhneZuordnung => "Ohne Zuordnung",
            ReceiptFilter::Zugeordnet => "Zugeordnet",
            ReceiptFilter::Verarbeitet => "Verarbeitet",
        }
    }

    pub fn next(&self) -> Self {
        let position = ReceiptFilter::ALL
            .iter()
            .position(|f| f == self)
            .unwrap_or(0);
        ReceiptFilter::ALL[(position + 1) % ReceiptFilter::ALL.len()]
    }

    fn matches_receipt(&self, receipt: &MandantReceipt) -> bool {
        match self {
            ReceiptFilter::All => true,
            ReceiptFilter::OhneZuordnung => !receipt.is_linked(),
            ReceiptFilter::Zugeordnet => receipt.is_linked(),
            ReceiptFilter::Verarbeitet => receipt.status == ReceiptStatus::Verarbeitet,
        }
    }
}

impl FromStr for ReceiptFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReceiptFilter::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::invalid("receipt filter", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptListFilter {
    pub status: ReceiptFilter,
    pub search: String,
}

impl ReceiptListFilter {
    /// Search hits the filename (case-insensitive) or the amount as typed
    pub fn matches(&self, receipt: &MandantReceipt) -> bool {
        let amount_hit = !self.search.is_empty()
            && receipt
                .amount
                .map(format::plain_number)
                .map_or(false, |text| text.contains(self.search.trim()));

        self.status.matches_receipt(receipt)
            && (contains_ci(&receipt.filename, &self.search) || amount_hit)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("DEUTSCHE TELEKOM", "telekom"));
        assert!(contains_ci("anything", ""));
        assert!(!contains_ci("Shell", "aral"));
    }

    #[test]
    fn test_client_filter_by_status_and_search() {
        let filter = ClientFilter {
            status: Some(ClientStatus::AtRisk),
            ..Default::default()
        };
        let at_risk: Vec<_> = mock_data::clients()
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        assert_eq!(at_risk.len(), 3);
        assert!(at_risk.iter().all(|c| c.status() == ClientStatus::AtRisk));

        let filter = ClientFilter {
            search: "gmbh".to_string(),
            ..Default::default()
        };
        let names: Vec<_> = mock_data::clients()
            .into_iter()
            .filter(|c| filter.matches(c))
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Müller GmbH", "Fischer Handels GmbH"]);
    }

    #[test]
    fn test_client_filter_by_cadence() {
        let filter = ClientFilter {
            cadence: Some(VatCadence::Quarterly),
            ..Default::default()
        };
        let count = mock_data::clients()
            .iter()
            .filter(|c| filter.matches(c))
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_sort_most_unmatched_descending() {
        let mut clients = mock_data::clients();
        ClientSort::MostUnmatched.apply(&mut clients);

        let totals: Vec<u32> = clients.iter().map(|c| c.unmatched_total()).collect();
        assert_eq!(totals, vec![39, 33, 27, 12, 7, 4]);
        assert_eq!(clients[0].name, "Bauer & Co. KG");
    }

    #[test]
    fn test_sort_name_and_completeness() {
        let mut clients = mock_data::clients();
        ClientSort::Name.apply(&mut clients);
        assert_eq!(clients[0].name, "Alpha Design Studio");

        ClientSort::Completeness.apply(&mut clients);
        assert_eq!(clients[0].receipt_completeness, 78);
        assert_eq!(clients[5].receipt_completeness, 98);
    }

    #[test]
    fn test_transaction_filter_status_only() {
        let filter = TransactionFilter {
            status: Some(MatchStatus::Suggestion),
            ..Default::default()
        };
        let hits: Vec<_> = mock_data::transactions()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        assert_eq!(hits.len(), 5);
        assert!(hits.iter().all(|t| t.status == MatchStatus::Suggestion));
    }

    #[test]
    fn test_transaction_search_by_amount_or_description() {
        let by_amount = TransactionFilter {
            search: "1500".to_string(),
            ..Default::default()
        };
        let ids: Vec<_> = mock_data::transactions()
            .into_iter()
            .filter(|t| by_amount.matches(t))
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t2"]);

        let by_text = TransactionFilter {
            search: "client payment".to_string(),
            ..Default::default()
        };
        let ids: Vec<_> = mock_data::transactions()
            .into_iter()
            .filter(|t| by_text.matches(t))
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t2", "t12"]);
    }

    #[test]
    fn test_date_range_bounds() {
        let r = reference();
        assert_eq!(DateRange::All.bounds(r), None);
        assert_eq!(
            DateRange::ThisMonth.bounds(r),
            Some((NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), r))
        );
        assert_eq!(
            DateRange::LastMonth.bounds(r),
            Some((
                NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
            ))
        );
        assert_eq!(
            DateRange::LastThreeMonths.bounds(r).unwrap().0,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_inbox_filter_conjunction() {
        let items = mock_data::inbox_items();

        let unfiltered = InboxFilter::default();
        assert_eq!(
            items.iter().filter(|i| unfiltered.matches(i, reference())).count(),
            13
        );

        let this_month = InboxFilter {
            date_range: DateRange::ThisMonth,
            ..Default::default()
        };
        assert_eq!(
            items.iter().filter(|i| this_month.matches(i, reference())).count(),
            10
        );

        let last_month = InboxFilter {
            date_range: DateRange::LastMonth,
            ..Default::default()
        };
        assert_eq!(
            items.iter().filter(|i| last_month.matches(i, reference())).count(),
            2
        );

        let fischer_unmatched = InboxFilter {
            client_id: Some("6".to_string()),
            status: Some(MatchStatus::Unmatched),
            date_range: DateRange::LastThreeMonths,
            search: String::new(),
        };
        let ids: Vec<_> = items
            .iter()
            .filter(|i| fischer_unmatched.matches(i, reference()))
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["i7", "i9"]);
    }

    #[test]
    fn test_inbox_search_fields() {
        let filter = InboxFilter {
            search: "bauer".to_string(),
            date_range: DateRange::LastThreeMonths,
            ..Default::default()
        };
        let count = mock_data::inbox_items()
            .iter()
            .filter(|i| filter.matches(i, reference()))
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_mandant_filter_defaults_to_open() {
        let filter = MandantTransactionFilter::default();
        let hits: Vec<_> = mock_data::mandant_transactions()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        assert_eq!(hits.len(), 5);
        assert!(hits.iter().all(|t| t.status == MandantStatus::Offen));
    }

    #[test]
    fn test_mandant_filter_month_and_search() {
        let filter = MandantTransactionFilter {
            period: Some(MonthFilter::new("Februar", 2024)),
            status: MandantStatusFilter::All,
            search: "berlin".to_string(),
        };
        let ids: Vec<_> = mock_data::mandant_transactions()
            .into_iter()
            .filter(|t| filter.matches(t))
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_receipt_filter_link_state() {
        let receipts = mock_data::mandant_receipts();
        let count = |status| {
            let filter = ReceiptListFilter {
                status,
                search: String::new(),
            };
            receipts.iter().filter(|r| filter.matches(r)).count()
        };
        assert_eq!(count(ReceiptFilter::All), 7);
        assert_eq!(count(ReceiptFilter::OhneZuordnung), 2);
        assert_eq!(count(ReceiptFilter::Zugeordnet), 5);
        assert_eq!(count(ReceiptFilter::Verarbeitet), 2);
    }

    #[test]
    fn test_receipt_search_by_amount() {
        let filter = ReceiptListFilter {
            status: ReceiptFilter::All,
            search: "89.99".to_string(),
        };
        let ids: Vec<_> = mock_data::mandant_receipts()
            .into_iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r5"]);
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional::<MatchStatus>("all").unwrap(), None);
        assert_eq!(
            parse_optional::<MatchStatus>("waiting").unwrap(),
            Some(MatchStatus::Waiting)
        );
        assert!(parse_optional::<MatchStatus>("pending").is_err());
        assert_eq!(ReceiptFilter::Verarbeitet.next(), ReceiptFilter::All);
    }
}
