// Trend series builder: per-customer (period, value) lines for the top-N
// trend chart, plus the anchor point each end-of-line label attaches to.
use crate::types::{ConsumptionRecord, PeriodKey, TrendPoint, TrendSeries};
use crate::units::Unit;
use std::collections::BTreeMap;

/// Build one series per customer in `customers`, preserving that order (the
/// caller passes the top-N set in rank order). Points are summed per period
/// and sorted ascending; the anchor is the customer's value at its own latest
/// period. Customers with no data in `records` produce no series.
pub fn build_trend_series(
    records: &[ConsumptionRecord],
    customers: &[String],
    unit: Unit,
) -> Vec<TrendSeries> {
    let metric = unit.metric();
    let divisor = unit.divisor();
    let mut by_customer: BTreeMap<&str, BTreeMap<PeriodKey, f64>> = BTreeMap::new();
    for r in records {
        *by_customer
            .entry(r.customer.as_str())
            .or_default()
            .entry(r.period)
            .or_insert(0.0) += metric.value_of(r);
    }

    customers
        .iter()
        .filter_map(|customer| {
            let by_period = by_customer.get(customer.as_str())?;
            let points: Vec<TrendPoint> = by_period
                .iter()
                .map(|(&period, &raw)| TrendPoint {
                    period,
                    value: raw / divisor,
                })
                .collect();
            let anchor = *points.last()?;
            Some(TrendSeries {
                customer: customer.clone(),
                points,
                anchor,
            })
        })
        .collect()
}
