use crate::decode;
use crate::models::HospitalRecord;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

const MIN_FIELDS: usize = 6;

/// Item markers the municipal export sometimes puts in front of addresses.
const ADDRESS_MARKERS: &[char] = &['.', '．', ' '];

pub fn read_hospitals(path: &Path) -> Result<Vec<HospitalRecord>> {
    let text = decode::decode_file(path)?;
    parse_hospitals(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parses every data row; header, footer and short rows are skipped silently.
pub fn parse_hospitals(text: &str) -> Result<Vec<HospitalRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if let Some(hospital) = parse_row(&record) {
            rows.push(hospital);
        }
    }
    Ok(rows)
}

pub fn parse_row(record: &StringRecord) -> Option<HospitalRecord> {
    if record.len() < MIN_FIELDS {
        return None;
    }
    let source_no = parse_source_no(&record[0])?;

    Some(HospitalRecord {
        source_no,
        municipality: record[1].trim().to_string(),
        name: record[2]
            .replace("\r\n", " ")
            .replace(['\n', '\r'], " ")
            .trim()
            .to_string(),
        postal_code: record[3].trim().to_string(),
        address: record[4]
            .trim()
            .trim_start_matches(ADDRESS_MARKERS)
            .trim()
            .to_string(),
        phone: record[5].trim().to_string(),
        coordinates: None,
    })
}

/// Accepts ASCII and full-width decimal digits only; no sign, no separators.
fn parse_source_no(field: &str) -> Option<u32> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    field.chars().try_fold(0u32, |acc, c| {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        acc.checked_mul(10)?.checked_add(digit)
    })
}
