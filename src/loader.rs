use crate::types::{ConsumptionRecord, RawRow};
use crate::util::{parse_f64_safe, parse_period};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
}

// Parsed record sets keyed by file path. A file is parsed once per process;
// the cache is only ever invalidated by restarting.
static RECORD_CACHE: Lazy<Mutex<HashMap<String, Arc<Vec<ConsumptionRecord>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Load and clean one of the summary CSVs. All three variants (yearly,
/// monthly, commercial monthly) go through the same raw row: the period comes
/// from `SalesYearMonth` when present, else `SalesYear`; the product column
/// is carried when the file has one. Rows with an unparseable period or
/// metric are counted and skipped, never fatal.
pub fn load_records(path: &str) -> Result<(Vec<ConsumptionRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut records: Vec<ConsumptionRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };

        let customer = match row.customer.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => {
                parse_errors += 1;
                continue;
            }
        };
        let period = match parse_period(row.sales_year_month.as_deref())
            .or_else(|| parse_period(row.sales_year.as_deref()))
        {
            Some(p) => p,
            None => {
                parse_errors += 1;
                continue;
            }
        };
        let volume = match parse_f64_safe(row.volume.as_deref()) {
            Some(v) => v,
            None => {
                parse_errors += 1;
                continue;
            }
        };
        let heat_quantity = match parse_f64_safe(row.heat_quantity.as_deref()) {
            Some(v) => v,
            None => {
                parse_errors += 1;
                continue;
            }
        };
        let product = row
            .product
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        records.push(ConsumptionRecord {
            customer,
            period,
            product,
            volume,
            heat_quantity,
        });
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        parse_errors,
    };
    Ok((records, report))
}

/// Memoized variant of [`load_records`]: the first call for a path parses the
/// file, later calls share the parsed set. A missing file surfaces as the
/// underlying csv/io error, the single "data unavailable" signal.
pub fn load_cached(path: &str) -> Result<Arc<Vec<ConsumptionRecord>>, Box<dyn Error>> {
    if let Some(records) = RECORD_CACHE.lock().unwrap().get(path) {
        return Ok(Arc::clone(records));
    }
    let (records, _) = load_records(path)?;
    let records = Arc::new(records);
    RECORD_CACHE
        .lock()
        .unwrap()
        .insert(path.to_string(), Arc::clone(&records));
    Ok(records)
}
