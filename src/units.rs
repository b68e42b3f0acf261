// Unit selection: which metric column a report reads and how it is scaled.
use crate::types::ConsumptionRecord;

/// Which raw metric column a unit reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Volume,
    Heat,
}

impl Metric {
    pub fn value_of(self, record: &ConsumptionRecord) -> f64 {
        match self {
            Metric::Volume => record.volume,
            Metric::Heat => record.heat_quantity,
        }
    }
}

/// The unit choices offered on the report sidebars. Each maps to a metric
/// column and a positive divisor; since the divisor is constant across a
/// whole report, changing units never reorders ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    CubicMeters,
    ThousandCubicMeters,
    Megajoules,
    Gigajoules,
}

impl Unit {
    pub const ALL: [Unit; 4] = [
        Unit::CubicMeters,
        Unit::ThousandCubicMeters,
        Unit::Megajoules,
        Unit::Gigajoules,
    ];

    pub fn metric(self) -> Metric {
        match self {
            Unit::CubicMeters | Unit::ThousandCubicMeters => Metric::Volume,
            Unit::Megajoules | Unit::Gigajoules => Metric::Heat,
        }
    }

    pub fn divisor(self) -> f64 {
        match self {
            Unit::CubicMeters | Unit::Megajoules => 1.0,
            Unit::ThousandCubicMeters | Unit::Gigajoules => 1000.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::CubicMeters => "m³",
            Unit::ThousandCubicMeters => "thousand m³",
            Unit::Megajoules => "MJ",
            Unit::Gigajoules => "GJ",
        }
    }
}

/// The converted metric value a report displays and ranks by.
pub fn convert(unit: Unit, record: &ConsumptionRecord) -> f64 {
    unit.metric().value_of(record) / unit.divisor()
}
