//! Spreadsheet CSV → specimen collection.
//!
//! The published export carries preamble rows above the real header, so the
//! header is located by scanning for the catalog id column.

use crate::domain::model::{CatalogId, Collection, PhotoManifest, Specimen, CATALOG_ID, CATALOG_NUMBER};
use crate::utils::error::{Result, SiteError};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const ID_MARKERS: [&str; 2] = [CATALOG_ID, CATALOG_NUMBER];

fn read_rows(csv_text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// 去頭尾空白並把連續空白壓成一個
fn normalize_header(cell: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"));
    re.replace_all(cell.trim(), " ").into_owned()
}

struct Header {
    index: usize,
    columns: Vec<String>,
    id_column: String,
}

fn find_header(rows: &[Vec<String>]) -> Result<Header> {
    for (index, row) in rows.iter().enumerate() {
        let marker = row
            .iter()
            .map(|cell| cell.trim())
            .find(|cell| ID_MARKERS.contains(cell));
        if let Some(marker) = marker {
            return Ok(Header {
                index,
                columns: row.iter().map(|c| normalize_header(c)).collect(),
                id_column: marker.to_string(),
            });
        }
    }
    Err(SiteError::HeaderNotFound {
        marker: ID_MARKERS.join("\" or \""),
    })
}

fn row_fields(columns: &[String], row: &[String]) -> HashMap<String, String> {
    columns
        .iter()
        .zip(row.iter())
        .filter(|(column, _)| !column.is_empty())
        .map(|(column, value)| (column.clone(), value.clone()))
        .collect()
}

/// Builds the collection keyed by catalog id. Rows whose id cell is empty or
/// not a number are skipped (zero and negative ids are kept); a repeated id keeps the last row.
pub fn parse_collection(csv_text: &str) -> Result<Collection> {
    let rows = read_rows(csv_text)?;
    let header = find_header(&rows)?;
    tracing::debug!(
        "Header row found at line {} ({} columns, id column \"{}\")",
        header.index + 1,
        header.columns.len(),
        header.id_column
    );

    let mut collection = Collection::new();
    let mut skipped = 0usize;
    for row in &rows[header.index + 1..] {
        let fields = row_fields(&header.columns, row);
        let id = fields
            .get(&header.id_column)
            .and_then(|raw| CatalogId::parse(raw));
        match id {
            Some(id) => {
                if collection.insert(id, Specimen::new(id, fields)).is_some() {
                    tracing::warn!("Duplicate catalog id {}, keeping the later row", id);
                }
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} rows without a numeric catalog id", skipped);
    }
    Ok(collection)
}

/// Photo sheet: every non-id cell of a row is a comma or whitespace
/// separated list of filenames or drive file ids, kept in sheet order.
pub fn parse_photo_manifest(csv_text: &str) -> Result<PhotoManifest> {
    let rows = read_rows(csv_text)?;
    let header = find_header(&rows)?;
    let id_index = header
        .columns
        .iter()
        .position(|c| *c == header.id_column)
        .unwrap_or_default();

    let mut manifest = PhotoManifest::default();
    for row in &rows[header.index + 1..] {
        let Some(id) = row.get(id_index).and_then(|raw| CatalogId::parse(raw)) else {
            continue;
        };
        let files: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != id_index)
            .flat_map(|(_, cell)| {
                cell.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        manifest.entries.insert(id, files);
    }
    Ok(manifest)
}
