use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::Listing;

/// Writes listings as delimited rows. The column set is the union of every
/// field seen across all listings, in first-seen order; a row missing a
/// column gets an empty cell. An empty input writes nothing.
pub fn save_listings_to_csv(listings: &[Listing], output_path: &str) -> Result<()> {
    if listings.is_empty() {
        warn!("no listings to save, skipping CSV output");
        return Ok(());
    }

    let file = File::create(Path::new(output_path))
        .context(format!("Failed to create output file: {}", output_path))?;
    let rows: Vec<Vec<(String, String)>> = listings.iter().map(Listing::to_fields).collect();
    write_rows(&rows, file)?;
    info!(count = listings.len(), path = output_path, "saved listings to CSV");
    Ok(())
}

/// Writes the same flat records as a JSON array.
pub fn save_listings_to_json(listings: &[Listing], output_path: &str) -> Result<()> {
    if listings.is_empty() {
        warn!("no listings to save, skipping JSON output");
        return Ok(());
    }

    let file = File::create(Path::new(output_path))
        .context(format!("Failed to create output file: {}", output_path))?;
    serde_json::to_writer_pretty(file, listings).context("Failed to serialize listings")?;
    info!(count = listings.len(), path = output_path, "saved listings to JSON");
    Ok(())
}

/// Union-of-keys tabular writer, generic over the destination.
pub fn write_rows<W: Write>(rows: &[Vec<(String, String)>], writer: W) -> Result<()> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for (key, _) in row {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&columns)?;
    for row in rows {
        let record: Vec<&str> = columns
            .iter()
            .map(|column| {
                row.iter()
                    .find(|(key, _)| key == column)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or("")
            })
            .collect();
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
