use crate::api::Mode;
use crate::args::StatusArgs;
use crate::commands::owed::standing;
use crate::commands::{load_ledger, today, Out};
use crate::model::Amount;
use crate::reconcile::{current_period_index, reconcile, target_index, PaidThrough};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Where every member stands, i.e. the rows of the payment chart.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub as_of: NaiveDate,
    pub include_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub period_labels: Vec<String>,
    pub current_period: Option<String>,
    pub members: Vec<MemberStatus>,
}

/// One row of the payment chart.
#[derive(Debug, Clone, Serialize)]
pub struct MemberStatus {
    pub name: String,
    pub last_paid_index: Option<usize>,
    pub paid_through: PaidThrough,
    /// The bar height in the chart: the index of the first unpaid period.
    pub paid_until_index: usize,
    /// What the member owes as of the report date.
    pub amount_owed: Amount,
}

/// Shows how far every member has paid as of `args.as_of` (or today).
pub async fn status(
    config: &Config,
    mode: Mode,
    args: &StatusArgs,
) -> Result<Out<StatusReport>> {
    let as_of = args.as_of.unwrap_or_else(today);
    let include_current = args
        .include_current()
        .unwrap_or_else(|| config.include_current());
    let ledger = load_ledger(config, mode).await?;
    let periods = ledger.periods();
    let current = current_period_index(periods, as_of);
    let target = target_index(current, include_current);

    let mut members = Vec::with_capacity(ledger.members().len());
    for member in ledger.members() {
        let reconciliation = reconcile(periods, member, target)?;
        members.push(MemberStatus {
            name: reconciliation.member().to_string(),
            last_paid_index: reconciliation.last_paid_index(),
            paid_through: reconciliation.paid_through().clone(),
            paid_until_index: reconciliation.paid_until_index(),
            amount_owed: reconciliation.amount_owed(),
        });
    }

    let mut message = format!("{} members as of {as_of}", members.len());
    for m in &members {
        message.push_str(&format!(
            "\n  {}, owes {}",
            standing(&m.name, &m.paid_through),
            m.amount_owed
        ));
    }

    Ok(Out::new(
        message,
        StatusReport {
            as_of,
            include_current,
            last_updated: ledger.last_updated().map(str::to_string),
            period_labels: periods.iter().map(|p| p.label().to_string()).collect(),
            current_period: current
                .and_then(|ix| periods.get(ix))
                .map(|p| p.label().to_string()),
            members,
        },
    ))
}
