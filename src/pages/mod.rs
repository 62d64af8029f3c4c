// 📄 Page containers
//
// Every page owns a private copy of the mock data plus its local UI state
// (filters, search, sort, dialogs, selected rows). Opening a route builds a
// fresh page, so nothing carries over between visits.

pub mod client_detail;
pub mod client_list;
pub mod inbox;
pub mod mandant_dashboard;
pub mod mandant_receipts;
pub mod mandant_transactions;
pub mod mandant_upload;
pub mod matching;

pub use client_detail::{ClientDetailPage, ClientKpis, ReportingPeriod, RiskOverview};
pub use client_list::{ClientListPage, ClientListSummary};
pub use inbox::{ClientOption, InboxKpis, InboxPage};
pub use mandant_dashboard::MandantDashboardPage;
pub use mandant_receipts::MandantReceiptsPage;
pub use mandant_transactions::{MandantTransactionsPage, UploadDialog};
pub use mandant_upload::{MandantUploadPage, UploadOutcome};
pub use matching::{MatchingPage, RequestDialog};

use chrono::NaiveDate;

use crate::error::Error;
use crate::role::{User, UserRole};
use crate::routes::{self, Route};

/// What a page needs to know about its surroundings
#[derive(Debug, Clone)]
pub struct PageContext {
    pub user: User,
    /// Anchor for relative date ranges
    pub reference_date: NaiveDate,
    pub today: NaiveDate,
}

#[derive(Debug, Clone)]
pub enum Page {
    ClientList(ClientListPage),
    Inbox(InboxPage),
    ClientDetail(ClientDetailPage),
    Matching(Box<MatchingPage>),
    MandantDashboard(MandantDashboardPage),
    MandantTransactions(MandantTransactionsPage),
    MandantUpload(MandantUploadPage),
    MandantReceipts(MandantReceiptsPage),
    /// Unknown path or unknown id
    NotFound { path: String, message: String },
    /// Route belongs to the other persona
    Denied { path: String, role: UserRole },
}

impl Page {
    /// Build the page for an already authorized route
    pub fn open(route: &Route, ctx: &PageContext) -> Page {
        match route {
            Route::ClientList => Page::ClientList(ClientListPage::new()),
            Route::Inbox => Page::Inbox(InboxPage::new(ctx.reference_date)),
            Route::ClientDetail { client_id } => match ClientDetailPage::open(client_id) {
                Ok(page) => Page::ClientDetail(page),
                Err(e) => Page::not_found(route, &e),
            },
            Route::Matching { client_id } => match MatchingPage::open(client_id, &ctx.user.name) {
                Ok(page) => Page::Matching(Box::new(page)),
                Err(e) => Page::not_found(route, &e),
            },
            Route::MandantDashboard => {
                Page::MandantDashboard(MandantDashboardPage::new(&ctx.user.name, ctx.today))
            }
            Route::MandantTransactions { period } => Page::MandantTransactions(
                MandantTransactionsPage::new(&ctx.user.name, period.clone()),
            ),
            Route::MandantUpload => Page::MandantUpload(MandantUploadPage::new(&ctx.user.name)),
            Route::MandantReceipts => Page::MandantReceipts(MandantReceiptsPage::new()),
            Route::NotFound { path } => Page::NotFound {
                path: path.clone(),
                message: "Seite nicht gefunden".to_string(),
            },
        }
    }

    /// Parse, gate and open a path for the active persona
    pub fn open_path(path: &str, ctx: &PageContext) -> (Route, Page) {
        match routes::resolve(path, ctx.user.role) {
            Ok(route) => {
                let page = Page::open(&route, ctx);
                (route, page)
            }
            Err(Error::Forbidden { path, role }) => {
                tracing::warn!(path = %path, role = %role, "Route denied");
                let route = Route::parse(&path);
                (route, Page::Denied { path, role })
            }
            Err(e) => {
                let route = Route::NotFound {
                    path: path.to_string(),
                };
                let page = Page::not_found(&route, &e);
                (route, page)
            }
        }
    }

    fn not_found(route: &Route, error: &Error) -> Page {
        let message = match error {
            Error::ClientNotFound(_) => "Client not found".to_string(),
            other => other.to_string(),
        };
        Page::NotFound {
            path: route.to_path(),
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Page::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::available_users;

    fn ctx(role: UserRole) -> PageContext {
        let user = available_users()
            .into_iter()
            .find(|u| u.role == role)
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        PageContext {
            user,
            reference_date: date,
            today: date,
        }
    }

    #[test]
    fn test_open_each_clerk_page() {
        let ctx = ctx(UserRole::TaxClerk);
        assert!(matches!(Page::open_path("/", &ctx).1, Page::ClientList(_)));
        assert!(matches!(Page::open_path("/inbox", &ctx).1, Page::Inbox(_)));
        assert!(matches!(Page::open_path("/clients/2", &ctx).1, Page::ClientDetail(_)));
        assert!(matches!(
            Page::open_path("/clients/2/matching", &ctx).1,
            Page::Matching(_)
        ));
    }

    #[test]
    fn test_unknown_client_is_not_found() {
        let ctx = ctx(UserRole::TaxClerk);
        match Page::open_path("/clients/77", &ctx).1 {
            Page::NotFound { message, .. } => assert_eq!(message, "Client not found"),
            other => panic!("unexpected page {:?}", other),
        }
        assert!(Page::open_path("/dashboards", &ctx).1.is_not_found());
    }

    #[test]
    fn test_denied_for_other_persona() {
        let ctx = ctx(UserRole::Client);
        let (route, page) = Page::open_path("/inbox", &ctx);
        assert_eq!(route, Route::Inbox);
        assert!(matches!(page, Page::Denied { role: UserRole::Client, .. }));

        let (_, page) = Page::open_path("/mandant/konto-vorgaenge?month=Januar&year=2024", &ctx);
        match page {
            Page::MandantTransactions(p) => assert_eq!(p.visible().len(), 1),
            other => panic!("unexpected page {:?}", other),
        }
    }
}
