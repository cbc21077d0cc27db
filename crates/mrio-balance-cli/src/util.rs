use anyhow::{bail, Result};
use std::path::Path;

/// Check that the `role` table (benchmark, row totals, column totals) at
/// `path` is an existing CSV or TSV file.
///
/// The delimiter is chosen from the extension when the table is read, so any
/// other extension is rejected up front.
pub fn validate_table_file(role: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("No {} table given", role);
    }

    let table = Path::new(path);
    let ext = table
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    if !matches!(ext.as_deref(), Some("csv") | Some("tsv")) {
        bail!("The {} table must be a .csv or .tsv file: {}", role, path);
    }
    if !table.is_file() {
        bail!("The {} table was not found: {}", role, path);
    }

    Ok(())
}

/// File stem of `path`, used as the default log label for a table.
pub fn table_label(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("matrix")
        .to_string()
}
