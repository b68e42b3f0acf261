// End-to-end properties of the report views, built over small hand-made
// record sets.
use gas_customer_report::output::{export_csv_string, parse_export};
use gas_customer_report::types::{ConsumptionRecord, PeriodKey};
use gas_customer_report::units::Unit;
use gas_customer_report::views::{
    commercial_report, monthly_report, race_view, trend_dashboard, CommercialParams,
    MonthlyParams, RaceParams, TrendParams,
};

fn yearly(customer: &str, year: i32, volume: f64) -> ConsumptionRecord {
    ConsumptionRecord {
        customer: customer.to_string(),
        period: PeriodKey::year(year),
        product: None,
        volume,
        heat_quantity: volume * 40.0,
    }
}

fn monthly(customer: &str, year: i32, month: u32, volume: f64) -> ConsumptionRecord {
    ConsumptionRecord {
        customer: customer.to_string(),
        period: PeriodKey::year_month(year, month),
        product: None,
        volume,
        heat_quantity: volume * 40.0,
    }
}

fn commercial(
    customer: &str,
    year: i32,
    month: u32,
    product: &str,
    volume: f64,
) -> ConsumptionRecord {
    ConsumptionRecord {
        customer: customer.to_string(),
        period: PeriodKey::year_month(year, month),
        product: Some(product.to_string()),
        volume,
        heat_quantity: volume * 40.0,
    }
}

#[test]
fn top_n_membership_is_anchored_to_the_reference_period() {
    // C outranks A in 2022 but misses the top 2 in 2023, so C drops out of
    // the whole series.
    let records = vec![
        yearly("A", 2022, 100.0),
        yearly("B", 2022, 100.0),
        yearly("C", 2022, 90.0),
        yearly("A", 2023, 80.0),
        yearly("B", 2023, 120.0),
    ];
    let params = TrendParams {
        unit: Unit::CubicMeters,
        top_n: 2,
        start_year: 2022,
        end_year: 2023,
        show_labels: true,
        chart_height: 1000,
    };
    let dash = trend_dashboard(&records, &params);

    let members: Vec<&str> = dash.series.iter().map(|s| s.customer.as_str()).collect();
    assert_eq!(members, vec!["B", "A"]);
    assert!(dash.export_rows.iter().all(|r| r.customer != "C"));

    // B anchors at 120 in 2023, A at 80.
    let b = &dash.series[0];
    assert_eq!(b.anchor.period, PeriodKey::year(2023));
    assert_eq!(b.anchor.value, 120.0);
    let a = &dash.series[1];
    assert_eq!(a.anchor.value, 80.0);

    // The rank grid ranks each year on its own: A and B share rank 1 in
    // 2022 (so nobody holds rank 2 there), and C's rank 3 stays out.
    assert_eq!(dash.rank_grid.headers, vec!["Rank", "2022", "2023"]);
    assert_eq!(dash.rank_grid.rows[0][1], "A (100), B (100)");
    assert_eq!(dash.rank_grid.rows[1][1], "-");
    assert_eq!(dash.rank_grid.rows[0][2], "B (120)");
    assert_eq!(dash.rank_grid.rows[1][2], "A (80)");
}

#[test]
fn trend_dashboard_export_round_trips() {
    let records = vec![
        yearly("가온에너지", 2022, 1_234_567.0),
        yearly("가온에너지", 2023, 2_345_678.0),
        yearly("B", 2023, 100.0),
    ];
    let params = TrendParams {
        unit: Unit::ThousandCubicMeters,
        top_n: 5,
        start_year: 2022,
        end_year: 2023,
        show_labels: false,
        chart_height: 800,
    };
    let dash = trend_dashboard(&records, &params);
    let csv = export_csv_string(&dash.export_rows).unwrap();
    let parsed = parse_export(&csv).unwrap();
    // Raw values survive the round trip untouched by unit conversion.
    assert_eq!(parsed, dash.export_rows);
    assert!(parsed
        .iter()
        .any(|r| r.customer == "가온에너지" && r.period == "2022" && r.volume == 1_234_567.0));
}

#[test]
fn monthly_report_totals_come_from_survivors_only() {
    // Annual totals: A = 180, B = 220, C = 90. Threshold 150 keeps A and B;
    // the highlighted total row must read 400, not 490.
    let records = vec![
        monthly("A", 2023, 1, 100.0),
        monthly("A", 2023, 7, 80.0),
        monthly("B", 2023, 2, 220.0),
        monthly("C", 2023, 3, 90.0),
    ];
    let params = MonthlyParams {
        year: 2023,
        unit: Unit::CubicMeters,
        min_total: Some(150.0),
        font_size_px: 15,
    };
    let report = monthly_report(&records, &params);
    let table = &report.table;

    // Rank, Customer, 12 months, annual total.
    assert_eq!(table.headers.len(), 15);
    assert_eq!(table.headers[2], "2023-01");
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0][1], "B");
    assert_eq!(table.rows[1][1], "A");

    let total_row = &table.rows[2];
    assert_eq!(total_row[1], "Annual total");
    assert_eq!(total_row[14], "400");
    assert_eq!(table.highlighted_rows, vec![2]);
}

#[test]
fn monthly_report_empty_threshold_result_is_renderable() {
    let records = vec![monthly("A", 2023, 1, 10.0)];
    let params = MonthlyParams {
        year: 2023,
        unit: Unit::CubicMeters,
        min_total: Some(1_000_000.0),
        font_size_px: 15,
    };
    let report = monthly_report(&records, &params);
    assert!(report.table.is_empty());
    assert!(report.table.highlighted_rows.is_empty());
}

#[test]
fn commercial_rank_window_keeps_stable_labels() {
    let mut records = Vec::new();
    for i in 1..=30 {
        records.push(commercial(
            &format!("Hotel {:02}", i),
            2023,
            1,
            "Heating",
            (1000 - i * 10) as f64,
        ));
    }
    let base = CommercialParams {
        year: 2023,
        unit: Unit::CubicMeters,
        products: None,
        min_total: Some(0.0),
        start_rank: 1,
        end_rank: 30,
        font_size_px: 15,
    };
    let wide = commercial_report(&records, &base);

    let narrow = commercial_report(
        &records,
        &CommercialParams {
            start_rank: 10,
            end_rank: 20,
            products: None,
            ..base
        },
    );

    // Rows labeled 10..=20 in the wide report equal the narrow report's rows.
    let wide_window: Vec<&Vec<String>> = wide
        .table
        .rows
        .iter()
        .filter(|r| r[0].parse::<usize>().map_or(false, |k| (10..=20).contains(&k)))
        .collect();
    let narrow_rows: Vec<&Vec<String>> = narrow
        .table
        .rows
        .iter()
        .filter(|r| r[0] != "-")
        .collect();
    for (w, n) in wide_window.iter().zip(&narrow_rows) {
        assert_eq!(&w[0..2], &n[0..2]);
    }
    assert_eq!(wide_window.len(), narrow_rows.len());
    assert_eq!(narrow_rows.first().unwrap()[0], "10");

    // The margin row sums only the windowed rows: ranks 10..=20 hold volumes
    // 900, 890, ..., 800.
    let expected: f64 = (10..=20).map(|i| (1000 - i * 10) as f64).sum();
    let margin = narrow.table.rows.last().unwrap();
    assert_eq!(margin[1], "Selected range total");
    assert_eq!(margin[14], gas_customer_report::util::format_number(expected, 0));
}

#[test]
fn commercial_product_filter_restricts_the_pivot() {
    let records = vec![
        commercial("Hotel K", 2023, 1, "Heating", 600_000.0),
        commercial("Hotel K", 2023, 2, "Cooling", 400_000.0),
        commercial("Mall P", 2023, 1, "Cooling", 800_000.0),
    ];
    let params = CommercialParams {
        year: 2023,
        unit: Unit::CubicMeters,
        products: Some(vec!["Heating".to_string()]),
        min_total: Some(0.0),
        start_rank: 1,
        end_rank: 50,
        font_size_px: 15,
    };
    let report = commercial_report(&records, &params);
    let names: Vec<&str> = report
        .table
        .rows
        .iter()
        .map(|r| r[1].as_str())
        .collect();
    assert_eq!(names, vec!["Hotel K", "Selected range total"]);
    // Only the Heating rows count toward the table...
    assert_eq!(report.table.rows[0][14], "600,000");
    // ...while the overview still spans the whole dataset.
    assert_eq!(report.overview.total_customers, 2);
    assert_eq!(report.overview.total_volume, 1_800_000.0);
    assert!(report.criteria.contains("Heating"));
}

#[test]
fn race_view_carries_stable_colors_and_fixed_axis() {
    let records = vec![
        yearly("A", 2022, 100.0),
        yearly("B", 2022, 50.0),
        yearly("A", 2023, 40.0),
        yearly("B", 2023, 90.0),
    ];
    let params = RaceParams {
        unit: Unit::CubicMeters,
        top_n: 5,
    };
    let view = race_view(&records, &params);

    assert_eq!(view.frames.len(), 2);
    // 2022 frame: ascending by value, A on top.
    let names_2022: Vec<&str> = view.frames[0].bars.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(names_2022, vec!["B", "A"]);
    // 2023 frame re-ranks: B on top.
    let names_2023: Vec<&str> = view.frames[1].bars.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(names_2023, vec!["A", "B"]);

    assert!((view.axis_max - 110.0).abs() < 1e-9);
    assert_eq!(view.colors.len(), 2);
    assert_ne!(view.colors["A"], view.colors["B"]);
    assert!(view.frame_ms > 0 && view.transition_ms > 0);
}
