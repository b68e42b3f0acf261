// File exports: the raw-data CSV download and the JSON overview stats.
//
// Exports are written as UTF-8 with a BOM so spreadsheet tools keep
// non-ASCII customer names intact on a round trip.
use crate::types::ExportRow;
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::Write;

const BOM: &str = "\u{FEFF}";

pub fn write_csv_with_bom(path: &str, rows: &[ExportRow]) -> Result<(), Box<dyn Error>> {
    let mut file = File::create(path)?;
    file.write_all(BOM.as_bytes())?;
    let mut wtr = csv::Writer::from_writer(file);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// The same export as an in-memory string, for download-style consumers.
pub fn export_csv_string(rows: &[ExportRow]) -> Result<String, Box<dyn Error>> {
    let mut buf: Vec<u8> = BOM.as_bytes().to_vec();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        for r in rows {
            wtr.serialize(r)?;
        }
        wtr.flush()?;
    }
    Ok(String::from_utf8(buf)?)
}

/// Re-read an export produced by this module. Tolerates a leading BOM.
pub fn parse_export(data: &str) -> Result<Vec<ExportRow>, Box<dyn Error>> {
    let data = data.strip_prefix(BOM).unwrap_or(data);
    let mut rdr = csv::Reader::from_reader(data.as_bytes());
    let mut rows = Vec::new();
    for result in rdr.deserialize::<ExportRow>() {
        rows.push(result?);
    }
    Ok(rows)
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}
