// 🔔 Session notices
//
// Every user-visible action leaves a timestamped notice. Notices live for
// the page session only; the front ends show the latest one as a toast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: NoticeLevel,

    /// What happened, e.g. "receipts_requested"
    pub kind: String,

    /// Toast headline
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Persona that triggered it
    pub actor: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, kind: &str, title: &str, actor: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            kind: kind.to_string(),
            title: title.to_string(),
            detail: None,
            actor: actor.to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// "Beleg hochgeladen: Die Zahlung wurde als eingereicht markiert."
    pub fn text(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{}: {}", self.title, detail),
            None => self.title.clone(),
        }
    }
}

/// Notices of one page session, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    notices: Vec<Notice>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, notice: Notice) -> &Notice {
        tracing::debug!(
            kind = %notice.kind,
            actor = %notice.actor,
            level = notice.level.as_str(),
            "{}",
            notice.text()
        );
        self.notices.push(notice);
        &self.notices[self.notices.len() - 1]
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        let plain = Notice::new(NoticeLevel::Success, "receipt_uploaded", "Beleg hochgeladen", "Muster-Mandant GmbH");
        assert_eq!(plain.text(), "Beleg hochgeladen");

        let detailed = plain.clone().with_detail("2 Dateien");
        assert_eq!(detailed.text(), "Beleg hochgeladen: 2 Dateien");
        assert_ne!(plain.id, Notice::new(NoticeLevel::Info, "x", "x", "x").id);
    }

    #[test]
    fn test_log_keeps_order() {
        let mut log = ActivityLog::new();
        assert!(log.latest().is_none());

        log.record(Notice::new(NoticeLevel::Info, "a", "first", "me"));
        log.record(Notice::new(NoticeLevel::Warning, "b", "second", "me"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().title, "second");
        let titles: Vec<_> = log.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
