///! Dataset readers
///!
///! - NEOs: CSV from the JPL small-body database (`pdes`, `name`, `diameter`, `pha` columns)
///! - Close approaches: JSON from the JPL close-approach data API (`fields` + `data` rows)

use anyhow::{Context, Result};
use neo_common::{CloseApproach, NearEarthObject};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw NEO CSV row; other columns are ignored
#[derive(Debug, Deserialize)]
struct NeoCsvRow {
    pdes: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    diameter: String,
    #[serde(default)]
    pha: String,
}

/// Close-approach API response
#[derive(Debug, Deserialize)]
struct CadResponse {
    #[serde(default)]
    fields: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// Column positions within a close-approach data row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CadColumns {
    designation: usize,
    time: usize,
    distance: usize,
    velocity: usize,
}

impl CadColumns {
    /// Layout of the API's default field list
    const DEFAULT: CadColumns = CadColumns {
        designation: 0,
        time: 3,
        distance: 4,
        velocity: 7,
    };

    fn from_fields(fields: &[String]) -> Self {
        let position = |name: &str, fallback: usize| {
            fields.iter().position(|f| f == name).unwrap_or_else(|| {
                if !fields.is_empty() {
                    warn!("Close-approach field '{}' not found, using column {}", name, fallback);
                }
                fallback
            })
        };

        Self {
            designation: position("des", Self::DEFAULT.designation),
            time: position("cd", Self::DEFAULT.time),
            distance: position("dist", Self::DEFAULT.distance),
            velocity: position("v_rel", Self::DEFAULT.velocity),
        }
    }
}

/// Load NEOs from a CSV file
pub async fn load_neos(csv_path: impl AsRef<Path>) -> Result<Vec<NearEarthObject>> {
    let csv_path = csv_path.as_ref();
    info!("Loading NEOs from: {}", csv_path.display());

    let content = tokio::fs::read_to_string(csv_path)
        .await
        .with_context(|| format!("Failed to read NEO CSV file: {}", csv_path.display()))?;

    let neos = parse_neos_csv(&content)?;
    info!("Loaded {} NEOs", neos.len());
    Ok(neos)
}

/// Parse NEO CSV content, skipping rows that cannot be read
pub fn parse_neos_csv(content: &str) -> Result<Vec<NearEarthObject>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("Failed to read NEO CSV header")?;
    if !headers.iter().any(|h| h == "pdes") {
        anyhow::bail!("NEO CSV header has no 'pdes' column");
    }

    let mut neos = Vec::new();
    let mut row_count = 0;
    let mut error_count = 0;

    for result in reader.deserialize::<NeoCsvRow>() {
        row_count += 1;

        match result {
            Ok(row) if row.pdes.trim().is_empty() => {
                error_count += 1;
                warn!("Skipping NEO CSV row {}: empty designation", row_count);
            }
            Ok(row) => {
                neos.push(NearEarthObject::from_fields(&row.pdes, &row.name, &row.diameter, &row.pha));
            }
            Err(e) => {
                error_count += 1;
                warn!("Error parsing NEO CSV row {}: {}", row_count, e);
            }
        }
    }

    debug!("Processed {} NEO CSV rows, {} errors", row_count, error_count);
    Ok(neos)
}

/// Load close approaches from a JSON file
pub async fn load_approaches(json_path: impl AsRef<Path>) -> Result<Vec<CloseApproach>> {
    let json_path = json_path.as_ref();
    info!("Loading close approaches from: {}", json_path.display());

    let content = tokio::fs::read_to_string(json_path)
        .await
        .with_context(|| format!("Failed to read close-approach JSON file: {}", json_path.display()))?;

    let approaches = parse_approaches_json(&content)?;
    info!("Loaded {} close approaches", approaches.len());
    Ok(approaches)
}

/// Parse close-approach JSON content, skipping rows that cannot be read
pub fn parse_approaches_json(json: &str) -> Result<Vec<CloseApproach>> {
    let response: CadResponse =
        serde_json::from_str(json).context("Failed to deserialize close-approach JSON")?;

    let columns = CadColumns::from_fields(&response.fields);
    let mut approaches = Vec::with_capacity(response.data.len());
    let mut error_count = 0;

    for (index, row) in response.data.iter().enumerate() {
        match approach_from_row(row, columns) {
            Ok(approach) => approaches.push(approach),
            Err(e) => {
                error_count += 1;
                warn!("Skipping close-approach row {}: {:#}", index + 1, e);
            }
        }
    }

    debug!(
        "Processed {} close-approach rows, {} errors",
        response.data.len(),
        error_count
    );
    Ok(approaches)
}

fn approach_from_row(row: &[Value], columns: CadColumns) -> Result<CloseApproach> {
    let designation = cell_text(row, columns.designation).context("missing designation")?;
    let time = cell_text(row, columns.time).context("missing approach time")?;
    let distance = cell_number(row, columns.distance).context("missing or non-numeric distance")?;
    let velocity = cell_number(row, columns.velocity).context("missing or non-numeric velocity")?;

    Ok(CloseApproach::new(designation, &time, distance, velocity)?)
}

fn cell_text(row: &[Value], index: usize) -> Option<String> {
    match row.get(index)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_number(row: &[Value], index: usize) -> Option<f64> {
    let value = match row.get(index)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}
