use serde::{Deserialize, Serialize};
use std::fmt;

/// A year or year-month bucket. Ordering is chronological; a bare year sorts
/// before any month of the same year, which only matters if a dataset mixed
/// both granularities (ours never do).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub year: i32,
    pub month: Option<u32>,
}

impl PeriodKey {
    pub fn year(year: i32) -> Self {
        PeriodKey { year, month: None }
    }

    pub fn year_month(year: i32, month: u32) -> Self {
        PeriodKey {
            year,
            month: Some(month),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(m) => write!(f, "{}-{:02}", self.year, m),
            None => write!(f, "{}", self.year),
        }
    }
}

/// One raw CSV row. The three dataset variants (yearly, monthly, commercial
/// monthly) share this shape; each leaves the columns it lacks empty.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Customer")]
    pub customer: Option<String>,
    #[serde(rename = "SalesYear")]
    pub sales_year: Option<String>,
    #[serde(rename = "SalesYearMonth")]
    pub sales_year_month: Option<String>,
    #[serde(rename = "Product")]
    pub product: Option<String>,
    #[serde(rename = "Volume")]
    pub volume: Option<String>,
    #[serde(rename = "HeatQuantity")]
    pub heat_quantity: Option<String>,
}

/// A cleaned, typed consumption row. Loaded once per session and treated as
/// immutable from then on; every derived table is recomputed from these.
#[derive(Debug, Clone)]
pub struct ConsumptionRecord {
    pub customer: String,
    pub period: PeriodKey,
    pub product: Option<String>,
    pub volume: f64,
    pub heat_quantity: f64,
}

/// One customer's converted metric value and rank within a single period.
/// Ranks are 1-based; ties share the minimum rank ("min" method).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub customer: String,
    pub period: PeriodKey,
    pub value: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub key: String,
    /// Dense rank by row total, once assigned. Stays put through later row
    /// filtering so displayed rank labels never shift.
    pub rank: Option<usize>,
    pub cells: Vec<f64>,
    pub total: f64,
}

/// Customer × period matrix of converted metric sums. Rectangular: every row
/// has one cell per column, absent data filled with 0. The margin row, when
/// present, sums the rows currently in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub columns: Vec<PeriodKey>,
    pub rows: Vec<PivotRow>,
    pub margin: Option<PivotRow>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub period: PeriodKey,
    pub value: f64,
}

/// One customer's line in the trend chart: points ascending by period plus
/// the anchor the end-of-line label attaches to.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub customer: String,
    pub points: Vec<TrendPoint>,
    pub anchor: TrendPoint,
}

/// One keyframe of the ranking race: that period's top customers, sorted
/// ascending by value so the largest bar draws at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceFrame {
    pub period: PeriodKey,
    pub bars: Vec<(String, f64)>,
}

/// Row-major rendering model handed to the presentation layer. Pure strings;
/// all numbers are already formatted with thousands separators.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub highlighted_rows: Vec<usize>,
    pub font_size_px: u32,
}

impl RenderModel {
    pub fn empty(font_size_px: u32) -> Self {
        RenderModel {
            headers: Vec::new(),
            rows: Vec::new(),
            highlighted_rows: Vec::new(),
            font_size_px,
        }
    }

    /// True for the "no matching data" state.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row of the raw-data export: unconverted values for the customers the
/// current view selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Period")]
    pub period: String,
    #[serde(rename = "Volume")]
    pub volume: f64,
    #[serde(rename = "HeatQuantity")]
    pub heat_quantity: f64,
}

/// Whole-dataset headline figures shown next to the commercial report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_customers: usize,
    pub total_volume: f64,
}
