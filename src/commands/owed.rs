use crate::api::Mode;
use crate::args::OwedArgs;
use crate::commands::{load_ledger, today, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Ledger};
use crate::reconcile::{current_period_index, reconcile, target_index, PaidThrough};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// The answer to "how much does this member owe right now?"
#[derive(Debug, Clone, Serialize)]
pub struct OwedReport {
    pub member: String,
    pub as_of: NaiveDate,
    pub include_current: bool,
    /// The label of the period that `as_of` falls in. Before the first period starts, that is the
    /// first period.
    pub current_period: Option<String>,
    /// The label of the last period charged for, if any.
    pub charged_through: Option<String>,
    /// The label of the period after the current one, when there is one.
    pub next_period: Option<String>,
    pub last_paid_index: Option<usize>,
    pub paid_through: PaidThrough,
    pub amount_owed: Amount,
}

/// The payment calculator: how much `args.member` owes as of `args.as_of` (or today).
pub async fn owed(config: &Config, mode: Mode, args: &OwedArgs) -> Result<Out<OwedReport>> {
    let ledger = load_ledger(config, mode).await?;
    let include_current = args
        .include_current()
        .unwrap_or_else(|| config.include_current());
    let as_of = args.as_of.unwrap_or_else(today);
    let report = owed_report(&ledger, &args.member, as_of, include_current)?;
    let message = message(&report);
    Ok(Out::new(message, report))
}

pub(super) fn owed_report(
    ledger: &Ledger,
    member: &str,
    as_of: NaiveDate,
    include_current: bool,
) -> Result<OwedReport> {
    let member = ledger
        .require_member(member)
        .pub_result(ErrorType::Precondition)?;
    let periods = ledger.periods();
    let current = current_period_index(periods, as_of);
    let target = target_index(current, include_current);
    debug!(
        "As of {as_of} the current period index is {current:?} and the target index is {target:?}"
    );
    let reconciliation = reconcile(periods, member, target)?;

    let label_at = |ix: Option<usize>| {
        ix.and_then(|ix| periods.get(ix))
            .map(|p| p.label().to_string())
    };
    Ok(OwedReport {
        member: member.name().to_string(),
        as_of,
        include_current,
        current_period: label_at(current),
        charged_through: label_at(target),
        next_period: label_at(current.map(|ix| ix + 1)),
        last_paid_index: reconciliation.last_paid_index(),
        paid_through: reconciliation.paid_through().clone(),
        amount_owed: reconciliation.amount_owed(),
    })
}

/// How far `member` has paid, as the start of a sentence.
pub(super) fn standing(member: &str, paid_through: &PaidThrough) -> String {
    match paid_through {
        PaidThrough::NoPaymentOnRecord => format!("{member} has no payment on record"),
        PaidThrough::Until(label) => format!("{member} has paid until {label}"),
        PaidThrough::FullySettled => format!("{member} is fully settled"),
    }
}

fn message(report: &OwedReport) -> String {
    let standing = standing(&report.member, &report.paid_through);
    match &report.charged_through {
        Some(label) => format!(
            "{standing} and owes {} up to and including {label}",
            report.amount_owed
        ),
        None => format!(
            "{standing} and owes {} because no period is due as of {}",
            report.amount_owed, report.as_of
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::FULLY_SETTLED;
    use crate::test::{as_of, TestEnv};

    async fn run(member: &str, include_current: Option<bool>) -> Out<OwedReport> {
        let env = TestEnv::new().await;
        let args = OwedArgs::new(member, include_current, Some(as_of()));
        owed(env.config(), Mode::Testing, &args).await.unwrap()
    }

    #[tokio::test]
    async fn test_owed_include_current() {
        let out = run("Eleni", None).await;
        let report = out.structure().unwrap();
        assert!(report.include_current);
        assert_eq!(report.amount_owed, Amount::euros(43));
        assert_eq!(report.current_period.as_deref(), Some("Mar 26"));
        assert_eq!(report.charged_through.as_deref(), Some("Mar 26"));
        assert_eq!(report.next_period.as_deref(), Some("Sep 26"));
        assert_eq!(report.paid_through, PaidThrough::Until("Mar 25".into()));
        assert_eq!(
            out.message(),
            "Eleni has paid until Mar 25 and owes 43€ up to and including Mar 26"
        );
    }

    #[tokio::test]
    async fn test_owed_exclude_current() {
        let out = run("Eleni", Some(false)).await;
        let report = out.structure().unwrap();
        assert!(!report.include_current);
        assert_eq!(report.amount_owed, Amount::euros(28));
        assert_eq!(report.charged_through.as_deref(), Some("Sep 25"));
    }

    #[tokio::test]
    async fn test_owed_follows_configured_default() {
        let env = TestEnv::excluding_current().await;
        let args = OwedArgs::new("Eleni", None, Some(as_of()));
        let report = owed(env.config(), Mode::Testing, &args)
            .await
            .unwrap()
            .structure()
            .unwrap()
            .clone();
        assert!(!report.include_current);
        assert_eq!(report.amount_owed, Amount::euros(28));
    }

    #[tokio::test]
    async fn test_owed_include_current_overrides_configured_default() {
        let env = TestEnv::excluding_current().await;
        let args = OwedArgs::new("Eleni", Some(true), Some(as_of()));
        let out = owed(env.config(), Mode::Testing, &args).await.unwrap();
        let report = out.structure().unwrap();
        assert!(report.include_current);
        assert_eq!(report.amount_owed, Amount::euros(43));
        assert_eq!(report.charged_through.as_deref(), Some("Mar 26"));
        assert!(out.message().ends_with("up to and including Mar 26"));
    }

    #[tokio::test]
    async fn test_owed_never_paid() {
        let out = run("Giorgos", None).await;
        let report = out.structure().unwrap();
        assert_eq!(report.amount_owed, Amount::euros(122));
        assert_eq!(report.last_paid_index, None);
        assert!(out.message().starts_with("Giorgos has no payment on record"));
    }

    #[tokio::test]
    async fn test_owed_settled_and_gaps() {
        let report = run("Katerina", None).await.structure().unwrap().clone();
        assert_eq!(report.amount_owed, Amount::euros(15));
        let report = run("Katerina", Some(false)).await.structure().unwrap().clone();
        assert!(report.amount_owed.is_zero());

        let out = run("Nikos", None).await;
        assert!(out.structure().unwrap().amount_owed.is_zero());
        assert!(out.message().contains(FULLY_SETTLED));

        let report = run("Dimitris", None).await.structure().unwrap().clone();
        assert_eq!(report.amount_owed, Amount::euros(69));
    }

    #[tokio::test]
    async fn test_owed_before_any_period() {
        // The first period starts on 2021-09-01 and counts as the current one until then.
        let env = TestEnv::new().await;
        let early = NaiveDate::from_ymd_opt(2021, 8, 31).unwrap();
        let args = OwedArgs::new("Giorgos", None, Some(early));
        let out = owed(env.config(), Mode::Testing, &args).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.amount_owed, Amount::euros(10));
        assert_eq!(report.current_period.as_deref(), Some("Sep 21"));
        assert_eq!(report.charged_through.as_deref(), Some("Sep 21"));
        assert_eq!(report.next_period.as_deref(), Some("Mar 22"));

        let args = OwedArgs::new("Giorgos", Some(false), Some(early));
        let out = owed(env.config(), Mode::Testing, &args).await.unwrap();
        let report = out.structure().unwrap();
        assert!(report.amount_owed.is_zero());
        assert!(report.charged_through.is_none());
        assert!(out.message().contains("no period is due"));
    }

    #[tokio::test]
    async fn test_owed_unknown_member() {
        let env = TestEnv::new().await;
        let args = OwedArgs::new("Maria", None, Some(as_of()));
        let err = owed(env.config(), Mode::Testing, &args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Precondition);
        assert!(err.to_string().contains("Known members"));
    }
}
