use crate::api::Mode;
use crate::commands::{load_ledger, Out};
use crate::model::{Amount, Period, Season};
use crate::{Config, Result};
use serde::Serialize;

/// The period axis of the payment chart.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodsReport {
    pub periods: Vec<Period>,
    /// The periods at which the fee changed, in order.
    pub price_changes: Vec<PriceChange>,
}

/// A period whose fee differs from the one before it.
#[derive(Debug, Clone, Serialize)]
pub struct PriceChange {
    pub label: String,
    pub season: Season,
    /// The full year in which the new fee starts.
    pub year: i32,
    pub unit_price: Amount,
}

/// Lists every period in the sheet with its start date and fee.
pub async fn periods(config: &Config, mode: Mode) -> Result<Out<PeriodsReport>> {
    let ledger = load_ledger(config, mode).await?;
    let periods = ledger.periods().to_vec();
    let price_changes = periods
        .iter()
        .filter(|p| p.is_price_change_marker())
        .map(|p| PriceChange {
            label: p.label().to_string(),
            season: p.season(),
            year: p.year(),
            unit_price: p.unit_price(),
        })
        .collect();

    let mut message = format!("{} periods", periods.len());
    for p in &periods {
        let marker = if p.is_price_change_marker() {
            "  (new price)"
        } else {
            ""
        };
        message.push_str(&format!(
            "\n  {}  starts {}  {}{marker}",
            p.label(),
            p.start_date(),
            p.unit_price()
        ));
    }

    Ok(Out::new(
        message,
        PeriodsReport {
            periods,
            price_changes,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_periods() {
        let env = TestEnv::new().await;
        let out = periods(env.config(), Mode::Testing).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.periods.len(), 11);
        assert_eq!(report.periods[0].label(), "Sep 21");
        assert_eq!(report.periods[10].label(), "Sep 26");

        let changes: Vec<(&str, Season, i32, Amount)> = report
            .price_changes
            .iter()
            .map(|c| (c.label.as_str(), c.season, c.year, c.unit_price))
            .collect();
        assert_eq!(
            changes,
            vec![
                ("Sep 23", Season::Sep, 2023, Amount::euros(13)),
                ("Sep 25", Season::Sep, 2025, Amount::euros(15)),
            ]
        );
        assert!(out.message().contains("Mar 24  starts 2024-03-01  13€"));

        let json = serde_json::to_value(&report.price_changes[0]).unwrap();
        assert_eq!(json["season"], "Sep");
        assert_eq!(json["year"], 2023);
    }
}
