use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context};
use flate2::read::GzDecoder;
use ndarray::{Array1, Array2};

use crate::dataset::Dataset;

/// Read a gzip-compressed TSV dataset: a header row of variable names
/// followed by numeric rows; the last column is the regression target.
pub fn load_dataset(path: &Path) -> anyhow::Result<Dataset<f64>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut lines = BufReader::new(GzDecoder::new(file)).lines();

    let header = lines
        .next()
        .context("dataset is empty (no header row)")??;
    let columns: Vec<String> = header.split('\t').map(str::to_owned).collect();
    if columns.len() < 2 {
        bail!("dataset needs at least one input column and one target column");
    }
    let n_features = columns.len() - 1;
    let variable_names = columns[..n_features].to_vec();

    let mut flat: Vec<f64> = Vec::new();
    let mut y: Vec<f64> = Vec::new();
    for (row, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != columns.len() {
            bail!(
                "row {} has {} fields, expected {}",
                row + 2,
                fields.len(),
                columns.len()
            );
        }
        for field in &fields[..n_features] {
            flat.push(parse_field(field, row)?);
        }
        y.push(parse_field(fields[n_features], row)?);
    }
    if y.is_empty() {
        bail!("dataset has a header but no data rows");
    }

    let x = Array2::from_shape_vec((y.len(), n_features), flat)
        .context("dataset rows do not form a rectangular matrix")?;
    Ok(Dataset::with_names(x, Array1::from_vec(y), variable_names))
}

fn parse_field(field: &str, row: usize) -> anyhow::Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .with_context(|| format!("row {}: `{}` is not a number", row + 2, field))
}
