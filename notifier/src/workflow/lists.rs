use anyhow::Context;
use icaocore::tracking::RowList;
use log::warn;
use std::path::Path;

/// Reads a header-less CSV watchlist or blacklist. Empty fields and blank
/// rows are dropped.
pub fn load_rows(path: &Path) -> anyhow::Result<RowList> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening list {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading list {}", path.display()))?;
        let row: Vec<String> = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(RowList::new(rows))
}

/// Like [`load_rows`], but an unset or missing file yields an empty list.
pub fn load_optional(path: Option<&Path>) -> anyhow::Result<RowList> {
    match path {
        Some(path) if path.exists() => load_rows(path),
        Some(path) => {
            warn!("list {} not found, using an empty list", path.display());
            Ok(RowList::default())
        }
        None => Ok(RowList::default()),
    }
}
