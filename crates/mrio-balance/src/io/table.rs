//! Labelled matrix and margin tables in CSV or TSV form.
//!
//! A matrix table has a header row whose first cell names the label column and
//! whose remaining cells are column labels; every following row starts with a
//! row label. A margin table has a header and exactly two columns,
//! `label,value`.
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};

/// A matrix together with its row and column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub values: Array2<f64>,
}

impl LabelledMatrix {
    pub fn new(
        row_labels: Vec<String>,
        column_labels: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self> {
        if values.dim() != (row_labels.len(), column_labels.len()) {
            bail!(
                "Labels ({} rows, {} columns) do not match matrix shape {:?}",
                row_labels.len(),
                column_labels.len(),
                values.dim()
            );
        }
        Ok(Self {
            row_labels,
            column_labels,
            values,
        })
    }
}

/// Target totals keyed by label, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Margins {
    pub labels: Vec<String>,
    pub values: Array1<f64>,
}

impl Margins {
    /// Reorder the totals to follow `labels`.
    ///
    /// Fails on the first label without a total, and on margin files that
    /// list a label twice.
    pub fn aligned_to(&self, labels: &[String]) -> Result<Array1<f64>> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(self.labels.len());
        for (i, label) in self.labels.iter().enumerate() {
            if index.insert(label.as_str(), i).is_some() {
                bail!("Duplicate margin label '{}'", label);
            }
        }

        let mut out = Array1::<f64>::zeros(labels.len());
        for (i, label) in labels.iter().enumerate() {
            let &src = index
                .get(label.as_str())
                .ok_or_else(|| anyhow!("No total given for '{}'", label))?;
            out[i] = self.values[src];
        }

        if self.labels.len() > labels.len() {
            let wanted: HashSet<&str> = labels.iter().map(|l| l.as_str()).collect();
            let extra = self
                .labels
                .iter()
                .filter(|l| !wanted.contains(l.as_str()))
                .count();
            log::warn!("Ignoring {} margin entries with no matching label", extra);
        }
        Ok(out)
    }
}

fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open table: {}", path.display()))
}

fn parse_value(record: &StringRecord, idx: usize, row_idx: usize, header: &str) -> Result<f64> {
    let raw = record
        .get(idx)
        .ok_or_else(|| anyhow!("Missing value for '{}' at row {}", header, row_idx + 1))?;
    raw.parse::<f64>()
        .with_context(|| format!("Invalid number '{}' for '{}' at row {}", raw, header, row_idx + 1))
}

/// Read a labelled matrix table.
pub fn read_labelled_matrix<P: AsRef<Path>>(path: P) -> Result<LabelledMatrix> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .context("Failed to read matrix header row")?
        .clone();
    if headers.len() < 2 {
        bail!(
            "Matrix table {} needs a label column and at least one value column",
            path.display()
        );
    }
    let column_labels: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();
    let ncols = column_labels.len();

    let mut row_labels = Vec::new();
    let mut values = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        if record.len() != ncols + 1 {
            bail!(
                "Row {} has {} fields, expected {}",
                row_idx + 1,
                record.len(),
                ncols + 1
            );
        }
        row_labels.push(record.get(0).unwrap_or_default().to_string());
        for (offset, header) in column_labels.iter().enumerate() {
            values.push(parse_value(&record, offset + 1, row_idx, header)?);
        }
    }
    if row_labels.is_empty() {
        bail!("Matrix table {} has no data rows", path.display());
    }

    let values = Array2::from_shape_vec((row_labels.len(), ncols), values)
        .context("Failed to build matrix")?;
    log::debug!(
        "Read {}x{} matrix from {}",
        row_labels.len(),
        ncols,
        path.display()
    );
    LabelledMatrix::new(row_labels, column_labels, values)
}

/// Read a two-column `label,value` margin table.
pub fn read_margins<P: AsRef<Path>>(path: P) -> Result<Margins> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .context("Failed to read margin header row")?
        .clone();
    if headers.len() != 2 {
        bail!(
            "Margin table {} must have exactly two columns, found {}",
            path.display(),
            headers.len()
        );
    }
    let value_header = headers.get(1).unwrap_or("value").to_string();

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        if record.len() != 2 {
            bail!("Row {} has {} fields, expected 2", row_idx + 1, record.len());
        }
        labels.push(record.get(0).unwrap_or_default().to_string());
        values.push(parse_value(&record, 1, row_idx, &value_header)?);
    }

    Ok(Margins {
        labels,
        values: Array1::from_vec(values),
    })
}

/// Write a labelled matrix in the layout [`read_labelled_matrix`] expects.
pub fn write_labelled_matrix<P: AsRef<Path>>(path: P, matrix: &LabelledMatrix) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter_for(path))
        .from_writer(BufWriter::new(file));

    let mut header = Vec::with_capacity(matrix.column_labels.len() + 1);
    header.push("label".to_string());
    header.extend(matrix.column_labels.iter().cloned());
    writer.write_record(&header)?;

    for (label, row) in matrix.row_labels.iter().zip(matrix.values.rows()) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(label.clone());
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn aligned_to_reorders_by_label() {
        let margins = Margins {
            labels: labels(&["b", "a", "c"]),
            values: array![2.0, 1.0, 3.0],
        };
        let aligned = margins.aligned_to(&labels(&["a", "b"])).unwrap();
        assert_eq!(aligned, array![1.0, 2.0]);
    }

    #[test]
    fn aligned_to_reports_missing_label() {
        let margins = Margins {
            labels: labels(&["a"]),
            values: array![1.0],
        };
        let err = margins.aligned_to(&labels(&["a", "z"])).unwrap_err();
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn aligned_to_rejects_duplicates() {
        let margins = Margins {
            labels: labels(&["a", "a"]),
            values: array![1.0, 2.0],
        };
        assert!(margins.aligned_to(&labels(&["a"])).is_err());
    }

    #[test]
    fn labelled_matrix_checks_shape() {
        assert!(LabelledMatrix::new(labels(&["r"]), labels(&["c1", "c2"]), array![[1.0]]).is_err());
    }

    #[test]
    fn delimiter_follows_extension() {
        assert_eq!(delimiter_for(Path::new("x.TSV")), b'\t');
        assert_eq!(delimiter_for(Path::new("x.csv")), b',');
        assert_eq!(delimiter_for(Path::new("x")), b',');
    }
}
