// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message filters for queued handlers.
//!
//! A filter decides whether a message enters a handler's queue. Filters run on
//! the producer's task, so they must be cheap and free of side effects.

use serde::Deserialize;
use std::sync::Arc;

use crate::message::{Facility, LogMessage, Severity};

/// Predicate deciding whether a message is accepted by a handler.
pub type MessageFilter = Arc<dyn Fn(&LogMessage) -> bool + Send + Sync>;

/// Wrap a closure as a [`MessageFilter`].
pub fn message_filter<F>(predicate: F) -> MessageFilter
where
    F: Fn(&LogMessage) -> bool + Send + Sync + 'static,
{
    Arc::new(predicate)
}

/// Declarative filter as written in configuration.
///
/// Every criterion that is present must match. An empty `FilterConfig`
/// produces no filter at all, i.e. accepts everything.
///
/// # Example
/// ```yaml
/// filter:
///   min_severity: warning     # warning, error, critical, alert, emergency (or warn, err, crit, emerg)
///   facilities: [auth, authpriv]
///   tags: [sshd, sudo]
///   contains: "Failed password"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Accept only messages at least this severe.
    pub min_severity: Option<Severity>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Accept only messages whose content contains this substring.
    pub contains: Option<String>,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.min_severity.is_none()
            && self.facilities.is_empty()
            && self.tags.is_empty()
            && self.contains.is_none()
    }

    pub fn matches(&self, msg: &LogMessage) -> bool {
        if let Some(threshold) = self.min_severity {
            if !msg.severity.at_least(threshold) {
                return false;
            }
        }
        if !self.facilities.is_empty() && !self.facilities.contains(&msg.facility) {
            return false;
        }
        if !self.tags.is_empty() {
            match &msg.tag {
                Some(tag) if self.tags.iter().any(|t| t == tag) => {}
                _ => return false,
            }
        }
        if let Some(needle) = &self.contains {
            if !msg.content.contains(needle.as_str()) {
                return false;
            }
        }
        true
    }

    /// Compile into a predicate, or `None` when no criteria are set.
    pub fn into_filter(self) -> Option<MessageFilter> {
        if self.is_empty() {
            None
        } else {
            Some(message_filter(move |msg| self.matches(msg)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_compiles_to_no_filter() {
        assert!(FilterConfig::default().into_filter().is_none());
    }

    #[test]
    fn severity_threshold_accepts_more_severe() {
        let cfg = FilterConfig {
            min_severity: Some(Severity::Warning),
            ..Default::default()
        };
        assert!(cfg.matches(&LogMessage::new("x").with_severity(Severity::Error)));
        assert!(cfg.matches(&LogMessage::new("x").with_severity(Severity::Warning)));
        assert!(!cfg.matches(&LogMessage::new("x").with_severity(Severity::Debug)));
    }

    #[test]
    fn all_criteria_must_match() {
        let cfg = FilterConfig {
            facilities: vec![Facility::Auth],
            tags: vec!["sshd".into()],
            contains: Some("Failed".into()),
            ..Default::default()
        };
        let hit = LogMessage::new("Failed password")
            .with_facility(Facility::Auth)
            .with_tag("sshd");
        assert!(cfg.matches(&hit));

        let wrong_tag = hit.clone().with_tag("cron");
        assert!(!cfg.matches(&wrong_tag));

        let untagged = LogMessage::new("Failed password").with_facility(Facility::Auth);
        assert!(!cfg.matches(&untagged));

        let wrong_facility = hit.clone().with_facility(Facility::Mail);
        assert!(!cfg.matches(&wrong_facility));
    }

    #[test]
    fn compiled_filter_matches_config() {
        let filter = FilterConfig {
            contains: Some("disk".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert!(filter(&LogMessage::new("disk full")));
        assert!(!filter(&LogMessage::new("cpu hot")));
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = r#"
min_severity: err
facilities: [auth, local3]
tags: [sshd]
"#;
        let cfg: FilterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.min_severity, Some(Severity::Error));

        let yaml = r#"
min_severity: error
facilities: [auth, local3]
tags: [sshd]
"#;
        let cfg: FilterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.min_severity, Some(Severity::Error));
        assert_eq!(cfg.facilities, vec![Facility::Auth, Facility::Local3]);
        assert_eq!(cfg.tags, vec!["sshd".to_string()]);
    }
}
