// Report rendering: pivot tables and rank grids turned into row-major string
// models for the presentation layer, plus a markdown preview for console and
// log inspection. Formatting only; no business rule lives here beyond
// "thousands separators, zero decimal places".
use crate::types::{PeriodKey, PivotTable, RankedRow, RenderModel};
use crate::util::format_number;
use std::collections::BTreeSet;
use tabled::{builder::Builder, settings::Style};

/// Render a pivot into headers + string rows. The Rank column appears only
/// when ranks were assigned; the margin row renders last with its index in
/// `highlighted_rows`. An empty pivot renders as the empty model, the
/// distinct "no matching data" state.
pub fn render_pivot(table: &PivotTable, total_header: &str, font_size_px: u32) -> RenderModel {
    if table.is_empty() {
        return RenderModel::empty(font_size_px);
    }
    let with_ranks = table.rows.iter().any(|r| r.rank.is_some());

    let mut headers = Vec::new();
    if with_ranks {
        headers.push("Rank".to_string());
    }
    headers.push("Customer".to_string());
    headers.extend(table.columns.iter().map(|p| p.to_string()));
    headers.push(total_header.to_string());

    let render_row = |key: &str, rank: Option<usize>, cells: &[f64], total: f64| {
        let mut out = Vec::with_capacity(headers.len());
        if with_ranks {
            out.push(rank.map_or_else(|| "-".to_string(), |k| k.to_string()));
        }
        out.push(key.to_string());
        out.extend(cells.iter().map(|v| format_number(*v, 0)));
        out.push(format_number(total, 0));
        out
    };

    let mut rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| render_row(&r.key, r.rank, &r.cells, r.total))
        .collect();
    let mut highlighted_rows = Vec::new();
    if let Some(margin) = &table.margin {
        highlighted_rows.push(rows.len());
        rows.push(render_row(&margin.key, None, &margin.cells, margin.total));
    }

    RenderModel {
        headers,
        rows,
        highlighted_rows,
        font_size_px,
    }
}

/// The yearly rank grid: rows = rank 1..=top_n, columns = periods, cell =
/// `Name (1,234)`. Customers sharing a rank in a period share a cell, joined
/// with ", "; ranks nobody holds in a period show `-`.
pub fn render_rank_grid(ranked: &[RankedRow], top_n: usize, font_size_px: u32) -> RenderModel {
    let periods: Vec<PeriodKey> = ranked
        .iter()
        .map(|r| r.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let ranks: Vec<usize> = ranked
        .iter()
        .filter(|r| r.rank <= top_n)
        .map(|r| r.rank)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if periods.is_empty() || ranks.is_empty() {
        return RenderModel::empty(font_size_px);
    }

    let mut headers = vec!["Rank".to_string()];
    headers.extend(periods.iter().map(|p| p.to_string()));

    let rows = ranks
        .into_iter()
        .map(|rank| {
            let mut row = vec![rank.to_string()];
            for &period in &periods {
                let holders: Vec<String> = ranked
                    .iter()
                    .filter(|r| r.period == period && r.rank == rank)
                    .map(|r| format!("{} ({})", r.customer, format_number(r.value, 0)))
                    .collect();
                row.push(if holders.is_empty() {
                    "-".to_string()
                } else {
                    holders.join(", ")
                });
            }
            row
        })
        .collect();

    RenderModel {
        headers,
        rows,
        highlighted_rows: Vec::new(),
        font_size_px,
    }
}

/// Markdown table preview of a render model, for console output and tests.
pub fn preview(model: &RenderModel) -> String {
    if model.is_empty() {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(model.headers.clone());
    for row in &model.rows {
        builder.push_record(row.clone());
    }
    builder.build().with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{assign_row_ranks, pivot};
    use crate::types::ConsumptionRecord;
    use crate::units::Unit;

    fn rec(customer: &str, year: i32, volume: f64) -> ConsumptionRecord {
        ConsumptionRecord {
            customer: customer.to_string(),
            period: PeriodKey::year(year),
            product: None,
            volume,
            heat_quantity: 0.0,
        }
    }

    #[test]
    fn pivot_renders_with_ranks_and_highlighted_margin() {
        let records = vec![
            rec("A", 2022, 1_500_000.0),
            rec("B", 2022, 900_000.0),
            rec("A", 2023, 2_000_000.0),
        ];
        let mut table = pivot(&records, Unit::CubicMeters, None, Some("Annual total"));
        assign_row_ranks(&mut table);
        let model = render_pivot(&table, "Annual total", 15);

        assert_eq!(
            model.headers,
            vec!["Rank", "Customer", "2022", "2023", "Annual total"]
        );
        assert_eq!(
            model.rows[0],
            vec!["1", "A", "1,500,000", "2,000,000", "3,500,000"]
        );
        // Margin row is last and highlighted, with no rank.
        assert_eq!(model.highlighted_rows, vec![2]);
        assert_eq!(model.rows[2][0], "-");
        assert_eq!(model.rows[2][1], "Annual total");
    }

    #[test]
    fn rank_column_is_omitted_when_no_ranks_assigned() {
        let records = vec![rec("A", 2023, 10.0)];
        let table = pivot(&records, Unit::CubicMeters, None, None);
        let model = render_pivot(&table, "Total", 15);
        assert_eq!(model.headers[0], "Customer");
    }

    #[test]
    fn empty_table_renders_the_no_data_state() {
        let table = pivot(&[], Unit::CubicMeters, None, Some("Total"));
        let model = render_pivot(&table, "Total", 15);
        assert!(model.is_empty());
    }

    #[test]
    fn rank_grid_joins_ties_and_dashes_gaps() {
        use crate::engine::rank_within_period;
        let records = vec![
            rec("A", 2022, 100.0),
            rec("B", 2022, 100.0),
            rec("C", 2022, 90.0),
            rec("A", 2023, 120.0),
        ];
        let ranked = rank_within_period(&records, Unit::CubicMeters);
        let model = render_rank_grid(&ranked, 3, 15);

        assert_eq!(model.headers, vec!["Rank", "2022", "2023"]);
        // Rank 1 in 2022 holds both tied customers.
        assert_eq!(model.rows[0][1], "A (100), B (100)");
        // Nobody holds rank 3 in 2023 (only A is present there).
        let rank3 = model.rows.iter().find(|r| r[0] == "3").unwrap();
        assert_eq!(rank3[2], "-");
    }

    #[test]
    fn preview_emits_a_markdown_table() {
        let model = RenderModel {
            headers: vec!["Customer".into(), "Total".into()],
            rows: vec![vec!["A".into(), "1,234".into()]],
            highlighted_rows: vec![],
            font_size_px: 15,
        };
        let text = preview(&model);
        assert!(text.contains("| Customer |"));
        assert!(text.contains("1,234"));
    }
}
