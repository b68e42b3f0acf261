//! Ranked multi-period reporting over gas customer consumption summaries.
//!
//! The crate loads yearly/monthly consumption CSVs once per session and turns
//! them, purely and on demand, into the view models the dashboards render:
//! unit-converted ranked pivot tables, top-N trend series with end-of-line
//! label anchors, and per-period ranking-race keyframes with a stable color
//! map. Chart drawing and widget state belong to the external UI layer; the
//! public surface here is `(records, parameters) -> view model`.

pub mod engine;
pub mod loader;
pub mod output;
pub mod race;
pub mod render;
pub mod trend;
pub mod types;
pub mod units;
pub mod util;
pub mod views;
