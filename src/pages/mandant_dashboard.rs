// 📊 Mandant dashboard - UStVA status at a glance

use chrono::NaiveDate;

use crate::entities::{Message, VatPeriodStatus};
use crate::filters::MonthFilter;
use crate::format;
use crate::mock_data;
use crate::routes::Route;

#[derive(Debug, Clone)]
pub struct MandantDashboardPage {
    user_name: String,
    today: NaiveDate,
    current_period: VatPeriodStatus,
    attention: Vec<VatPeriodStatus>,
    messages: Vec<Message>,
}

impl MandantDashboardPage {
    pub fn new(user_name: &str, today: NaiveDate) -> Self {
        Self {
            user_name: user_name.to_string(),
            today,
            current_period: mock_data::current_vat_period(),
            attention: mock_data::periods_needing_attention(),
            messages: mock_data::messages(),
        }
    }

    pub fn welcome(&self) -> String {
        format!("Willkommen, {}", self.user_name)
    }

    pub fn subtitle(&self) -> &'static str {
        "Überblick über Ihre Beleg-Situation"
    }

    /// "18. Oktober 2026"
    pub fn today_label(&self) -> String {
        format::long_date_de(self.today)
    }

    pub fn current_period(&self) -> &VatPeriodStatus {
        &self.current_period
    }

    pub fn periods_needing_attention(&self) -> &[VatPeriodStatus] {
        &self.attention
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// "Fällig am 10.04.2026"
    pub fn due_label(&self) -> Option<String> {
        self.current_period
            .due_date
            .as_ref()
            .map(|d| format!("Fällig am {}", d))
    }

    fn transactions_for(period: &VatPeriodStatus) -> Route {
        Route::MandantTransactions {
            period: Some(MonthFilter::new(&period.month, period.year)),
        }
    }

    /// Open the transactions page filtered to the current period
    pub fn open_current_period(&self) -> Route {
        Self::transactions_for(&self.current_period)
    }

    /// Open the transactions page filtered to one of the attention periods
    pub fn open_period(&self, index: usize) -> Option<Route> {
        let period = self.attention.get(index)?;
        tracing::debug!(period = %period.title(), "Dashboard → transactions");
        Some(Self::transactions_for(period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MandantDashboardPage {
        MandantDashboardPage::new(
            "Muster-Mandant GmbH",
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
    }

    #[test]
    fn test_header() {
        let page = page();
        assert_eq!(page.welcome(), "Willkommen, Muster-Mandant GmbH");
        assert_eq!(page.today_label(), "31. März 2026");
        assert_eq!(page.due_label().as_deref(), Some("Fällig am 10.04.2026"));
        assert_eq!(page.current_period().missing_label(), "4 Belege fehlen");
    }

    #[test]
    fn test_lists() {
        let page = page();
        assert_eq!(page.periods_needing_attention().len(), 3);
        assert_eq!(page.messages().len(), 5);
        assert_eq!(page.messages()[0].from, "Sabine Kramer");
    }

    #[test]
    fn test_period_navigation() {
        let page = page();
        assert_eq!(
            page.open_period(0).unwrap().to_path(),
            "/mandant/konto-vorgaenge?month=Februar&year=2024"
        );
        assert_eq!(
            page.open_current_period(),
            Route::MandantTransactions {
                period: Some(MonthFilter::new("März", 2026))
            }
        );
        assert!(page.open_period(3).is_none());
    }
}
