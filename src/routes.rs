// 🧭 Router - URL paths to page containers
//
// The same paths address pages in the TUI and in the HTTP API. Unknown paths
// resolve to `Route::NotFound`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::filters::MonthFilter;
use crate::role::UserRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum Route {
    ClientList,
    Inbox,
    ClientDetail { client_id: String },
    Matching { client_id: String },
    MandantDashboard,
    MandantTransactions { period: Option<MonthFilter> },
    MandantUpload,
    MandantReceipts,
    NotFound { path: String },
}

impl Route {
    pub fn parse(raw: &str) -> Route {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };

        let trimmed = path.trim_end_matches('/');
        let segments: Vec<String> = trimmed
            .split('/')
            .skip(1)
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        if !raw.starts_with('/') {
            return Route::NotFound { path: raw.to_string() };
        }

        match segments.as_slice() {
            [] => Route::ClientList,
            ["inbox"] => Route::Inbox,
            ["clients", id] if !id.is_empty() => Route::ClientDetail {
                client_id: id.to_string(),
            },
            ["clients", id, "matching"] if !id.is_empty() => Route::Matching {
                client_id: id.to_string(),
            },
            ["mandant", "dashboard"] => Route::MandantDashboard,
            ["mandant", "konto-vorgaenge"] => Route::MandantTransactions {
                period: query.and_then(period_from_query),
            },
            ["mandant", "beleg-upload"] => Route::MandantUpload,
            ["mandant", "belege"] => Route::MandantReceipts,
            _ => Route::NotFound { path: raw.to_string() },
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::ClientList => "/".to_string(),
            Route::Inbox => "/inbox".to_string(),
            Route::ClientDetail { client_id } => {
                format!("/clients/{}", urlencoding::encode(client_id))
            }
            Route::Matching { client_id } => {
                format!("/clients/{}/matching", urlencoding::encode(client_id))
            }
            Route::MandantDashboard => "/mandant/dashboard".to_string(),
            Route::MandantTransactions { period: None } => "/mandant/konto-vorgaenge".to_string(),
            Route::MandantTransactions { period: Some(p) } => format!(
                "/mandant/konto-vorgaenge?month={}&year={}",
                urlencoding::encode(&p.month),
                p.year
            ),
            Route::MandantUpload => "/mandant/beleg-upload".to_string(),
            Route::MandantReceipts => "/mandant/belege".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Role that may open this route. `None` for the not-found page.
    pub fn required_role(&self) -> Option<UserRole> {
        match self {
            Route::ClientList
            | Route::Inbox
            | Route::ClientDetail { .. }
            | Route::Matching { .. } => Some(UserRole::TaxClerk),
            Route::MandantDashboard
            | Route::MandantTransactions { .. }
            | Route::MandantUpload
            | Route::MandantReceipts => Some(UserRole::Client),
            Route::NotFound { .. } => None,
        }
    }

    pub fn is_allowed_for(&self, role: UserRole) -> bool {
        self.required_role().map_or(true, |required| required == role)
    }

    pub fn authorize(&self, role: UserRole) -> Result<()> {
        if self.is_allowed_for(role) {
            Ok(())
        } else {
            Err(Error::Forbidden {
                path: self.to_path(),
                role,
            })
        }
    }

    pub fn title(&self) -> String {
        match self {
            Route::ClientList => "Mandanten".to_string(),
            Route::Inbox => "Posteingang".to_string(),
            Route::ClientDetail { client_id } => format!("Mandant {}", client_id),
            Route::Matching { client_id } => format!("Matching {}", client_id),
            Route::MandantDashboard => "Dashboard".to_string(),
            Route::MandantTransactions { period: Some(p) } => {
                format!("Konto-Vorgänge {}", p.label())
            }
            Route::MandantTransactions { period: None } => "Konto-Vorgänge".to_string(),
            Route::MandantUpload => "Beleg-Upload".to_string(),
            Route::MandantReceipts => "Belege".to_string(),
            Route::NotFound { .. } => "Seite nicht gefunden".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Parse and gate in one step
pub fn resolve(path: &str, role: UserRole) -> Result<Route> {
    let route = Route::parse(path);
    route.authorize(role)?;
    tracing::debug!(path, role = %role, "Resolved route");
    Ok(route)
}

/// `month=Februar&year=2024` → period; both parameters are required
fn period_from_query(query: &str) -> Option<MonthFilter> {
    let mut month = None;
    let mut year = None;

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value).ok()?.into_owned();
        match key {
            "month" if !value.is_empty() => month = Some(value),
            "year" => year = value.parse::<i32>().ok(),
            _ => {}
        }
    }

    Some(MonthFilter {
        month: month?,
        year: year?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_routes() -> Vec<Route> {
        vec![
            Route::ClientList,
            Route::Inbox,
            Route::ClientDetail { client_id: "3".to_string() },
            Route::Matching { client_id: "3".to_string() },
            Route::MandantDashboard,
            Route::MandantTransactions { period: None },
            Route::MandantTransactions {
                period: Some(MonthFilter::new("März", 2026)),
            },
            Route::MandantUpload,
            Route::MandantReceipts,
        ]
    }

    #[test]
    fn test_parse_and_format_agree() {
        for route in all_routes() {
            assert_eq!(Route::parse(&route.to_path()), route, "{}", route);
        }
    }

    #[test]
    fn test_query_period() {
        assert_eq!(
            Route::parse("/mandant/konto-vorgaenge?month=Februar&year=2024"),
            Route::MandantTransactions {
                period: Some(MonthFilter::new("Februar", 2024))
            }
        );
        assert_eq!(
            Route::MandantTransactions {
                period: Some(MonthFilter::new("März", 2026))
            }
            .to_path(),
            "/mandant/konto-vorgaenge?month=M%C3%A4rz&year=2026"
        );
        // month without year is ignored
        assert_eq!(
            Route::parse("/mandant/konto-vorgaenge?month=Februar"),
            Route::MandantTransactions { period: None }
        );
        // bare keys are skipped
        assert_eq!(
            Route::parse("/mandant/konto-vorgaenge?month=Februar&year=2024&ref"),
            Route::MandantTransactions {
                period: Some(MonthFilter::new("Februar", 2024))
            }
        );
    }

    #[test]
    fn test_unknown_paths() {
        for path in ["/dashboards", "/settings", "/clients", "/clients/1/matching/x", "inbox"] {
            assert!(
                matches!(Route::parse(path), Route::NotFound { .. }),
                "{} should not resolve",
                path
            );
        }
        assert_eq!(Route::parse("/inbox/"), Route::Inbox);
    }

    #[test]
    fn test_role_gating() {
        assert!(resolve("/inbox", UserRole::TaxClerk).is_ok());
        assert!(matches!(
            resolve("/inbox", UserRole::Client),
            Err(Error::Forbidden { .. })
        ));
        assert!(matches!(
            resolve("/mandant/belege", UserRole::TaxClerk),
            Err(Error::Forbidden { .. })
        ));
        // not-found is reachable by everyone
        assert!(resolve("/nowhere", UserRole::Client).is_ok());
    }

    #[test]
    fn test_navigation_targets_resolve_for_their_role() {
        for role in [UserRole::TaxClerk, UserRole::Client] {
            for item in role.navigation() {
                let route = resolve(&item.path, role).unwrap();
                assert!(!matches!(route, Route::NotFound { .. }));
            }
        }
    }
}
