use crate::error::{ErrorType, IntoResult, Res};
use crate::model::period::normalize_inner;
use crate::model::{Member, Period, RawFeed};
use crate::Result;
use anyhow::{bail, Context};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// A validated, immutable view of the payment sheet: the normalized periods and every member's
/// payment flags. Every member has exactly one flag per period and member names are unique.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Ledger {
    periods: Vec<Period>,
    members: Vec<Member>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
}

impl Ledger {
    /// Normalizes the periods of `feed` and validates its members against them.
    pub fn from_feed(feed: RawFeed) -> Result<Self> {
        Self::from_feed_inner(feed).pub_result(ErrorType::Feed)
    }

    pub(crate) fn from_feed_inner(feed: RawFeed) -> Res<Self> {
        let periods = normalize_inner(&feed.periods).context("Unable to normalize the periods")?;
        let mut seen = HashSet::new();
        for member in &feed.members {
            if member.name().trim().is_empty() {
                bail!("The feed contains a member with an empty name");
            }
            if !seen.insert(member.name()) {
                bail!("The feed lists member '{}' more than once", member.name());
            }
            if member.payment_flags().len() != periods.len() {
                bail!(
                    "Member '{}' has {} payment flags but the feed has {} periods",
                    member.name(),
                    member.payment_flags().len(),
                    periods.len()
                );
            }
        }
        debug!(
            "Loaded a ledger with {} periods and {} members",
            periods.len(),
            feed.members.len()
        );
        Ok(Self {
            periods,
            members: feed.members,
            last_updated: feed.last_updated,
        })
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// When the publisher last updated the sheet, if the feed says so.
    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Looks up a member by exact name.
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Looks up a member by exact name, with an error that lists the known names.
    pub(crate) fn require_member(&self, name: &str) -> Res<&Member> {
        match self.member(name) {
            Some(member) => Ok(member),
            None => {
                let known: Vec<&str> = self.members.iter().map(|m| m.name()).collect();
                bail!(
                    "There is no member named '{name}'. Known members: {}",
                    known.join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(members: Vec<Member>) -> RawFeed {
        RawFeed {
            periods: vec!["2023-02-28".into(), "2023-08-31".into()],
            members,
            last_updated: Some("2023-09-04".into()),
        }
    }

    #[test]
    fn test_from_feed() {
        let ledger = Ledger::from_feed(feed(vec![
            Member::new("Eleni", [true, false]),
            Member::new("Nikos", [true, true]),
        ]))
        .unwrap();
        assert_eq!(ledger.periods().len(), 2);
        assert_eq!(ledger.members().len(), 2);
        assert_eq!(ledger.last_updated(), Some("2023-09-04"));
        assert_eq!(ledger.member("Nikos").unwrap().last_paid_index(), Some(1));
        assert!(ledger.member("nikos").is_none());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = Ledger::from_feed(feed(vec![Member::new("Eleni", [true])])).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Feed);
        assert!(err.to_string().contains("1 payment flags"));
    }

    #[test]
    fn test_duplicate_member_is_rejected() {
        let err = Ledger::from_feed(feed(vec![
            Member::new("Eleni", [true, false]),
            Member::new("Eleni", [true, true]),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(Ledger::from_feed(feed(vec![Member::new(" ", [true, false])])).is_err());
    }

    #[test]
    fn test_bad_period_is_rejected() {
        let mut raw = feed(vec![]);
        raw.periods.push("2024-13-01".into());
        assert!(Ledger::from_feed(raw).is_err());
    }

    #[test]
    fn test_require_member_lists_known_names() {
        let ledger = Ledger::from_feed(feed(vec![
            Member::new("Eleni", [true, false]),
            Member::new("Nikos", [true, true]),
        ]))
        .unwrap();
        let err = ledger.require_member("Maria").unwrap_err();
        assert!(err.to_string().contains("Eleni, Nikos"));
    }
}
