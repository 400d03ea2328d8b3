//! Works out how far each member has paid and how much they owe.
//!
//! Everything in here is pure: the same periods, member and cutoff always give the same
//! `Reconciliation`, and nothing is read from or written to the outside world. Deciding what
//! "today" is belongs to the caller.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{Amount, Member, Period};
use crate::Result;
use anyhow::bail;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// The text shown when a member has never paid.
pub const NO_PAYMENT_ON_RECORD: &str = "no payment on record";

/// The text shown when a member has paid for the last period in the sheet.
pub const FULLY_SETTLED: &str = "fully settled";

/// How far a member has paid.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(tag = "status", content = "label", rename_all = "snake_case")]
pub enum PaidThrough {
    /// No paid flag is set at all.
    NoPaymentOnRecord,
    /// The label of the first period after the last paid one.
    Until(String),
    /// The last paid period is the last period in the sheet.
    FullySettled,
}

impl PaidThrough {
    fn new(periods: &[Period], last_paid_index: Option<usize>) -> Self {
        match last_paid_index {
            None => PaidThrough::NoPaymentOnRecord,
            Some(ix) => match periods.get(ix + 1) {
                Some(next) => PaidThrough::Until(next.label().to_string()),
                None => PaidThrough::FullySettled,
            },
        }
    }

    /// The display label, e.g. `Sep 23`, or one of the two sentinel texts.
    pub fn label(&self) -> &str {
        match self {
            PaidThrough::NoPaymentOnRecord => NO_PAYMENT_ON_RECORD,
            PaidThrough::Until(label) => label,
            PaidThrough::FullySettled => FULLY_SETTLED,
        }
    }
}

impl Display for PaidThrough {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The outcome of reconciling one member at one cutoff.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Reconciliation {
    member: String,
    last_paid_index: Option<usize>,
    paid_through: PaidThrough,
    target_index: Option<usize>,
    amount_owed: Amount,
}

impl Reconciliation {
    pub fn member(&self) -> &str {
        &self.member
    }

    /// The highest period index with a paid flag, or `None` if the member never paid.
    pub fn last_paid_index(&self) -> Option<usize> {
        self.last_paid_index
    }

    pub fn paid_through(&self) -> &PaidThrough {
        &self.paid_through
    }

    pub fn paid_through_label(&self) -> &str {
        self.paid_through.label()
    }

    /// The last period index included in `amount_owed`, or `None` for "before any period".
    pub fn target_index(&self) -> Option<usize> {
        self.target_index
    }

    pub fn amount_owed(&self) -> Amount {
        self.amount_owed
    }

    /// The height of the member's bar in the payment chart: the index of the first unpaid period,
    /// or zero when there is no payment on record.
    pub fn paid_until_index(&self) -> usize {
        self.last_paid_index.map(|ix| ix + 1).unwrap_or(0)
    }
}

/// Reconciles `member` against `periods` up to and including `target_index`.
///
/// The amount owed is the sum of the unit prices of every period after the member's last paid
/// period, up to and including `target_index`. A `target_index` of `None` means "before any
/// period" and indices past the last period contribute nothing.
///
/// # Errors
/// Returns a `Precondition` error if the member does not have exactly one flag per period.
pub fn reconcile(
    periods: &[Period],
    member: &Member,
    target_index: Option<usize>,
) -> Result<Reconciliation> {
    reconcile_inner(periods, member, target_index).pub_result(ErrorType::Precondition)
}

fn reconcile_inner(
    periods: &[Period],
    member: &Member,
    target_index: Option<usize>,
) -> Res<Reconciliation> {
    if member.payment_flags().len() != periods.len() {
        bail!(
            "Member '{}' has {} payment flags but there are {} periods",
            member.name(),
            member.payment_flags().len(),
            periods.len()
        );
    }

    let last_paid_index = member.last_paid_index();
    let first_owed = last_paid_index.map(|ix| ix + 1).unwrap_or(0);
    let amount_owed = match target_index {
        None => Amount::ZERO,
        Some(target) => periods
            .iter()
            .take(target.saturating_add(1))
            .skip(first_owed)
            .map(Period::unit_price)
            .sum(),
    };

    Ok(Reconciliation {
        member: member.name().to_string(),
        last_paid_index,
        paid_through: PaidThrough::new(periods, last_paid_index),
        target_index,
        amount_owed,
    })
}

/// The index of the current period: the last one whose start date is on or before `today`.
/// Before the first period starts, the first period is the current one. Returns `None` only when
/// there are no periods.
pub fn current_period_index(periods: &[Period], today: NaiveDate) -> Option<usize> {
    if periods.is_empty() {
        return None;
    }
    let started = periods
        .iter()
        .take_while(|p| p.start_date() <= today)
        .count();
    Some(started.saturating_sub(1))
}

/// The last period to charge for. When the current period is excluded, this is the period before
/// it, which may be "before any period".
pub fn target_index(current_period_index: Option<usize>, include_current: bool) -> Option<usize> {
    match current_period_index {
        None => None,
        Some(current) if include_current => Some(current),
        Some(current) => current.checked_sub(1),
    }
}
