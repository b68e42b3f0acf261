// The ranked multi-period aggregation engine.
//
// Every report view is a composition of the operations here: filter by
// period range, rank customers within each period, select a top-N set
// anchored to a reference period, pivot into a customer × period matrix,
// then thin the pivot with value and rank-window filters. All operations are
// pure; empty output is a valid "no matching data" state, never an error.
use crate::types::{ConsumptionRecord, PeriodKey, PivotRow, PivotTable, RankedRow};
use crate::units::Unit;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Keep records whose period lies in `[start, end]` inclusive.
pub fn filter_by_period_range(
    records: &[ConsumptionRecord],
    start: PeriodKey,
    end: PeriodKey,
) -> Vec<ConsumptionRecord> {
    records
        .iter()
        .filter(|r| r.period >= start && r.period <= end)
        .cloned()
        .collect()
}

/// Rank customers within each period, descending by converted metric value.
///
/// Values are summed per (period, customer) first, so datasets with several
/// rows per customer per period (one per product) rank the customer once.
/// Ties share the minimum rank: values [100, 100, 90] rank [1, 1, 3]. A
/// customer absent from a period takes no rank slot there.
pub fn rank_within_period(records: &[ConsumptionRecord], unit: Unit) -> Vec<RankedRow> {
    let divisor = unit.divisor();
    let metric = unit.metric();
    let mut groups: BTreeMap<PeriodKey, BTreeMap<String, f64>> = BTreeMap::new();
    for r in records {
        *groups
            .entry(r.period)
            .or_default()
            .entry(r.customer.clone())
            .or_insert(0.0) += metric.value_of(r);
    }

    let mut out = Vec::new();
    for (period, customers) in groups {
        let mut sorted: Vec<(String, f64)> = customers
            .into_iter()
            .map(|(c, raw)| (c, raw / divisor))
            .collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let mut rank = 0usize;
        let mut prev: Option<f64> = None;
        for (i, (customer, value)) in sorted.into_iter().enumerate() {
            if prev != Some(value) {
                rank = i + 1;
                prev = Some(value);
            }
            out.push(RankedRow {
                customer,
                period,
                value,
                rank,
            });
        }
    }
    out
}

/// Customers holding rank ≤ `n` in the reference period, ordered by
/// (rank, customer). Inclusion is rank-based, so ties at the boundary all
/// make the cut and the result can exceed `n` entries.
pub fn select_top_n(ranked: &[RankedRow], reference: PeriodKey, n: usize) -> Vec<String> {
    let mut hits: Vec<&RankedRow> = ranked
        .iter()
        .filter(|r| r.period == reference && r.rank <= n)
        .collect();
    hits.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.customer.cmp(&b.customer)));
    hits.into_iter().map(|r| r.customer.clone()).collect()
}

/// Group-sum pivot: rows = customers, columns = periods, cells = converted
/// metric sums. Missing cells fill with 0 so the table stays rectangular;
/// rows come back sorted descending by total.
///
/// `columns` forces a fixed column set (the monthly reports always show all
/// twelve months); `None` derives the columns from the data. `margin_label`
/// appends a totals row with that key, summing the rows present.
pub fn pivot(
    records: &[ConsumptionRecord],
    unit: Unit,
    columns: Option<&[PeriodKey]>,
    margin_label: Option<&str>,
) -> PivotTable {
    let columns: Vec<PeriodKey> = match columns {
        Some(cols) => cols.to_vec(),
        None => {
            let set: BTreeSet<PeriodKey> = records.iter().map(|r| r.period).collect();
            set.into_iter().collect()
        }
    };

    let metric = unit.metric();
    let divisor = unit.divisor();
    let mut sums: BTreeMap<String, BTreeMap<PeriodKey, f64>> = BTreeMap::new();
    for r in records {
        *sums
            .entry(r.customer.clone())
            .or_default()
            .entry(r.period)
            .or_insert(0.0) += metric.value_of(r);
    }

    let mut rows: Vec<PivotRow> = sums
        .into_iter()
        .map(|(customer, by_period)| {
            let cells: Vec<f64> = columns
                .iter()
                .map(|p| by_period.get(p).copied().unwrap_or(0.0) / divisor)
                .collect();
            let total = cells.iter().sum();
            PivotRow {
                key: customer,
                rank: None,
                cells,
                total,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut table = PivotTable {
        columns,
        rows,
        margin: None,
    };
    if let Some(label) = margin_label {
        set_margin(&mut table, label);
    }
    table
}

/// Assign dense min-tie ranks over row totals. Assumes the rows are already
/// sorted descending by total, which `pivot` guarantees.
pub fn assign_row_ranks(table: &mut PivotTable) {
    let mut rank = 0usize;
    let mut prev: Option<f64> = None;
    for (i, row) in table.rows.iter_mut().enumerate() {
        if prev != Some(row.total) {
            rank = i + 1;
            prev = Some(row.total);
        }
        row.rank = Some(rank);
    }
}

/// Drop rows whose total falls below `min_total`. Assigned ranks are kept
/// as-is; the margin row is recomputed from the surviving rows only, so
/// filtering a row out decreases the margin total by exactly that row's
/// total.
pub fn apply_value_range_filter(mut table: PivotTable, min_total: f64) -> PivotTable {
    table.rows.retain(|r| r.total >= min_total);
    refresh_margin(&mut table);
    table
}

/// Keep rows whose previously assigned rank lies in `[start_rank, end_rank]`.
/// Ranks are never reassigned here: narrowing the window must not change the
/// rank labels the surviving rows display. Rows that were never ranked are
/// dropped. The margin is recomputed from the survivors.
pub fn slice_rank_window(mut table: PivotTable, start_rank: usize, end_rank: usize) -> PivotTable {
    table
        .rows
        .retain(|r| r.rank.is_some_and(|k| k >= start_rank && k <= end_rank));
    refresh_margin(&mut table);
    table
}

/// Attach (or replace) the margin row, summing the rows currently present.
pub fn set_margin(table: &mut PivotTable, label: &str) {
    if table.rows.is_empty() {
        table.margin = None;
        return;
    }
    let mut cells = vec![0.0; table.columns.len()];
    for row in &table.rows {
        for (acc, v) in cells.iter_mut().zip(&row.cells) {
            *acc += v;
        }
    }
    let total = cells.iter().sum();
    table.margin = Some(PivotRow {
        key: label.to_string(),
        rank: None,
        cells,
        total,
    });
}

fn refresh_margin(table: &mut PivotTable) {
    if let Some(margin) = table.margin.take() {
        set_margin(table, &margin.key);
    }
}
