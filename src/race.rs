// Ranked race sequencer: per-period top-N keyframes for the animated bar
// ranking, plus the fixed customer → color assignment that keeps a customer
// recognizable across frames and across charts in the same session.
//
// Frame transitions, easing and playback controls belong to the external
// chart layer; this module only produces the ordered frame data and carries
// the timing defaults that layer starts from.
use crate::engine::{rank_within_period, select_top_n};
use crate::types::{ConsumptionRecord, PeriodKey, RaceFrame};
use crate::units::{convert, Unit};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Default qualitative cycle of the charting layer; customers are assigned
/// colors round-robin from here.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Default keyframe duration handed to the chart layer, in milliseconds.
pub const FRAME_MS: u32 = 1500;
/// Default between-frame transition duration, in milliseconds.
pub const TRANSITION_MS: u32 = 1200;

/// Everything the external chart layer needs to draw the race: ordered
/// frames, the session color map, a fixed value axis, and timing defaults.
#[derive(Debug, Clone)]
pub struct RaceView {
    pub title: String,
    pub frames: Vec<RaceFrame>,
    pub colors: HashMap<String, &'static str>,
    /// Fixed upper bound of the value axis (global max plus 10% headroom) so
    /// the axis does not rescale between frames.
    pub axis_max: f64,
    pub frame_ms: u32,
    pub transition_ms: u32,
}

/// Build the session color map over the full customer universe: position in
/// the sorted customer enumeration, modulo the palette size. Computed once
/// and shared, so a customer keeps one color in every frame and every chart.
pub fn color_assignments(records: &[ConsumptionRecord]) -> HashMap<String, &'static str> {
    let universe: BTreeSet<&str> = records.iter().map(|r| r.customer.as_str()).collect();
    universe
        .into_iter()
        .enumerate()
        .map(|(i, customer)| (customer.to_string(), PALETTE[i % PALETTE.len()]))
        .collect()
}

/// One frame per period, ascending by period. Each frame holds that period's
/// top-N customers re-ranked from scratch (ties at the boundary included),
/// sorted ascending by value so the largest bar draws at the top.
pub fn build_race_frames(records: &[ConsumptionRecord], unit: Unit, top_n: usize) -> Vec<RaceFrame> {
    let ranked = rank_within_period(records, unit);
    let periods: BTreeSet<PeriodKey> = ranked.iter().map(|r| r.period).collect();

    periods
        .into_iter()
        .map(|period| {
            let members = select_top_n(&ranked, period, top_n);
            let mut bars: Vec<(String, f64)> = ranked
                .iter()
                .filter(|r| r.period == period && members.contains(&r.customer))
                .map(|r| (r.customer.clone(), r.value))
                .collect();
            bars.sort_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            RaceFrame { period, bars }
        })
        .collect()
}

/// Fixed value-axis upper bound: the global converted maximum plus headroom.
pub fn axis_max(records: &[ConsumptionRecord], unit: Unit) -> f64 {
    records
        .iter()
        .map(|r| convert(unit, r))
        .fold(0.0, f64::max)
        * 1.1
}
