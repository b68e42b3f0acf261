// View-model builders, one per dashboard page. Each is a pure function from
// (records, parameters) to a fully formatted view model; the interactive UI
// layer re-calls these on every parameter change and keeps no state here.
// Parameters arrive pre-normalized from the UI boundary (start <= end, etc.).
use crate::engine::{
    apply_value_range_filter, assign_row_ranks, filter_by_period_range, pivot, rank_within_period,
    select_top_n, slice_rank_window,
};
use crate::race::{axis_max, build_race_frames, color_assignments, RaceView, FRAME_MS, TRANSITION_MS};
use crate::render::{render_pivot, render_rank_grid};
use crate::trend::build_trend_series;
use crate::types::{
    ConsumptionRecord, ExportRow, OverviewStats, PeriodKey, RenderModel, TrendSeries,
};
use crate::units::Unit;
use crate::util::format_number;
use std::collections::{BTreeSet, HashMap, HashSet};

pub const DEFAULT_FONT_SIZE_PX: u32 = 15;

/// Default minimum annual totals for the industrial monthly report, per unit.
/// Configuration defaults carried over from the report templates; no physical
/// conversion between the volume and heat figures is implied.
pub fn industrial_default_min(unit: Unit) -> f64 {
    match unit {
        Unit::CubicMeters => 1_000_000.0,
        Unit::ThousandCubicMeters => 1_000.0,
        Unit::Megajoules => 40_000_000.0,
        Unit::Gigajoules => 40_000.0,
    }
}

/// Default minimum annual totals for the commercial monthly report, per unit.
pub fn commercial_default_min(unit: Unit) -> f64 {
    match unit {
        Unit::CubicMeters => 500_000.0,
        Unit::ThousandCubicMeters => 500.0,
        Unit::Megajoules => 20_000_000.0,
        Unit::Gigajoules => 20_000.0,
    }
}

fn months_of(year: i32) -> Vec<PeriodKey> {
    (1..=12).map(|m| PeriodKey::year_month(year, m)).collect()
}

fn export_rows_for(records: &[ConsumptionRecord]) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = records
        .iter()
        .map(|r| ExportRow {
            customer: r.customer.clone(),
            period: r.period.to_string(),
            volume: r.volume,
            heat_quantity: r.heat_quantity,
        })
        .collect();
    rows.sort_by(|a, b| a.customer.cmp(&b.customer).then_with(|| a.period.cmp(&b.period)));
    rows
}

/// Whole-dataset headline figures (distinct customers, total raw volume).
pub fn overview_stats(records: &[ConsumptionRecord]) -> OverviewStats {
    let customers: HashSet<&str> = records.iter().map(|r| r.customer.as_str()).collect();
    OverviewStats {
        total_customers: customers.len(),
        total_volume: records.iter().map(|r| r.volume).sum(),
    }
}

/// Sorted distinct product categories, for the commercial multi-select.
pub fn product_categories(records: &[ConsumptionRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.product.as_deref())
        .collect();
    set.into_iter().map(str::to_string).collect()
}

pub struct TrendParams {
    pub unit: Unit,
    pub top_n: usize,
    pub start_year: i32,
    pub end_year: i32,
    pub show_labels: bool,
    pub chart_height: u32,
}

pub struct TrendDashboard {
    pub title: String,
    pub series: Vec<TrendSeries>,
    /// Session color map over the full customer universe; shared with the
    /// race view so a customer keeps one color everywhere.
    pub colors: HashMap<String, &'static str>,
    /// Rank × year grid: each year's own top N, not the anchored set.
    pub rank_grid: RenderModel,
    /// Customer × year pivot over the anchored top-N set, with a total margin.
    pub customer_pivot: RenderModel,
    /// Raw (unconverted) rows for the anchored set, for the CSV download.
    pub export_rows: Vec<ExportRow>,
    pub show_labels: bool,
    pub chart_height: u32,
}

/// The yearly dashboard: top-N membership is decided once, at the latest
/// period present in the selected range, and applied to the whole series. A
/// customer outside the top N there drops out of every year of the chart and
/// pivot, even years where it ranked higher.
pub fn trend_dashboard(records: &[ConsumptionRecord], params: &TrendParams) -> TrendDashboard {
    let filtered = filter_by_period_range(
        records,
        PeriodKey::year(params.start_year),
        PeriodKey::year(params.end_year),
    );
    let ranked = rank_within_period(&filtered, params.unit);
    let top = match filtered.iter().map(|r| r.period).max() {
        Some(reference) => select_top_n(&ranked, reference, params.top_n),
        None => Vec::new(),
    };

    let members: HashSet<&str> = top.iter().map(String::as_str).collect();
    let member_records: Vec<ConsumptionRecord> = filtered
        .iter()
        .filter(|r| members.contains(r.customer.as_str()))
        .cloned()
        .collect();

    let series = build_trend_series(&member_records, &top, params.unit);
    let rank_grid = render_rank_grid(&ranked, params.top_n, DEFAULT_FONT_SIZE_PX);
    let customer_table = pivot(&member_records, params.unit, None, Some("Total"));
    let customer_pivot = render_pivot(&customer_table, "Total", DEFAULT_FONT_SIZE_PX);

    TrendDashboard {
        title: format!(
            "Yearly {} trend (top {} customers)",
            params.unit.label(),
            params.top_n
        ),
        series,
        colors: color_assignments(records),
        rank_grid,
        customer_pivot,
        export_rows: export_rows_for(&member_records),
        show_labels: params.show_labels,
        chart_height: params.chart_height,
    }
}

pub struct MonthlyParams {
    pub year: i32,
    pub unit: Unit,
    /// `None` falls back to the per-unit default threshold.
    pub min_total: Option<f64>,
    pub font_size_px: u32,
}

pub struct MonthlyReport {
    pub title: String,
    pub criteria: String,
    pub table: RenderModel,
    pub min_total: f64,
}

/// The industrial monthly report: one selected year, all twelve month
/// columns, customers below the annual-total threshold dropped, ranks
/// assigned over the survivors, the "Annual total" margin row highlighted.
pub fn monthly_report(records: &[ConsumptionRecord], params: &MonthlyParams) -> MonthlyReport {
    let min_total = params
        .min_total
        .unwrap_or_else(|| industrial_default_min(params.unit));
    let months = months_of(params.year);
    let year_records = filter_by_period_range(records, months[0], months[11]);

    let table = pivot(&year_records, params.unit, Some(&months), Some("Annual total"));
    let mut table = apply_value_range_filter(table, min_total);
    assign_row_ranks(&mut table);

    MonthlyReport {
        title: format!(
            "{} key industrial customers, monthly consumption",
            params.year
        ),
        criteria: format!(
            "annual total >= {} {}",
            format_number(min_total, 0),
            params.unit.label()
        ),
        table: render_pivot(&table, "Annual total", params.font_size_px),
        min_total,
    }
}

pub struct CommercialParams {
    pub year: i32,
    pub unit: Unit,
    /// Product categories to include; `None` keeps all.
    pub products: Option<Vec<String>>,
    pub min_total: Option<f64>,
    pub start_rank: usize,
    pub end_rank: usize,
    pub font_size_px: u32,
}

pub struct CommercialReport {
    pub title: String,
    pub criteria: String,
    pub overview: OverviewStats,
    pub table: RenderModel,
    pub min_total: f64,
}

/// The commercial monthly report: product multi-select, then ranks assigned
/// over the full year pivot before the rank window and threshold filters run,
/// so the displayed rank labels stay stable however the window narrows. The
/// margin row sums only the rows left on screen.
pub fn commercial_report(
    records: &[ConsumptionRecord],
    params: &CommercialParams,
) -> CommercialReport {
    let overview = overview_stats(records);
    let min_total = params
        .min_total
        .unwrap_or_else(|| commercial_default_min(params.unit));
    let months = months_of(params.year);
    let year_records = filter_by_period_range(records, months[0], months[11]);

    let selected: Vec<ConsumptionRecord> = match &params.products {
        Some(products) => year_records
            .iter()
            .filter(|r| {
                r.product
                    .as_deref()
                    .is_some_and(|p| products.iter().any(|q| q == p))
            })
            .cloned()
            .collect(),
        None => year_records,
    };

    let mut table = pivot(&selected, params.unit, Some(&months), Some("Selected range total"));
    assign_row_ranks(&mut table);
    let table = slice_rank_window(table, params.start_rank, params.end_rank);
    let table = apply_value_range_filter(table, min_total);

    let products_display = match &params.products {
        Some(products) if products.is_empty() => "none".to_string(),
        Some(products) => products.join(", "),
        None => "all".to_string(),
    };

    CommercialReport {
        title: format!(
            "{} key commercial customers (ranks {} to {})",
            params.year, params.start_rank, params.end_rank
        ),
        criteria: format!(
            "unit: {} | annual total >= {} | products: {}",
            params.unit.label(),
            format_number(min_total, 0),
            products_display
        ),
        overview,
        table: render_pivot(&table, "Annual total", params.font_size_px),
        min_total,
    }
}

pub struct RaceParams {
    pub unit: Unit,
    pub top_n: usize,
}

/// The ranking-race view: every period re-ranked from scratch, fixed axis,
/// session colors, default playback timings for the chart layer.
pub fn race_view(records: &[ConsumptionRecord], params: &RaceParams) -> RaceView {
    RaceView {
        title: format!("Ranking race by {}", params.unit.label()),
        frames: build_race_frames(records, params.unit, params.top_n),
        colors: color_assignments(records),
        axis_max: axis_max(records, params.unit),
        frame_ms: FRAME_MS,
        transition_ms: TRANSITION_MS,
    }
}
