//! Mapping file discovery and loading

use std::io::{BufRead, Write};
use std::path::Path;

use tokio::fs;

use crate::{
    error::{AppError, AppResult},
    models::{RawShelfEntry, ShelfEntry},
};

/// Loaded mapping file
#[derive(Debug, Clone)]
pub struct Mapping {
    /// Number of rows in the file, complete or not
    pub total: usize,
    pub entries: Vec<ShelfEntry>,
}

/// YAML files in the input directory, sorted by name
pub async fn list_input_files(dir: &Path) -> AppResult<Vec<String>> {
    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| AppError::Input(format!("Cannot read {}: {}", dir.display(), e)))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        );
        if is_yaml && path.is_file() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
    }

    if files.is_empty() {
        return Err(AppError::Input("No input files found".to_string()));
    }
    files.sort();
    Ok(files)
}

/// Ask the operator to pick one of `files` by number
pub fn prompt_selection<R: BufRead, W: Write>(
    files: &[String],
    mut input: R,
    mut output: W,
) -> AppResult<String> {
    writeln!(output, "Select input file: ")?;
    for (index, file) in files.iter().enumerate() {
        writeln!(output, "  {}) {}", index + 1, file)?;
    }

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(AppError::Input("No input file selected".to_string()));
        }
        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=files.len()).contains(&choice) => {
                return Ok(files[choice - 1].clone());
            }
            _ => writeln!(output, "Enter a number between 1 and {}", files.len())?,
        }
    }
}

/// Read a mapping file; rows missing a shelf number, DLCS id or OCLC list are dropped
pub async fn load_mapping(path: &Path) -> AppResult<Mapping> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Input(format!("Cannot open {}: {}", path.display(), e)))?;

    let rows: Option<Vec<serde_yaml::Value>> = serde_yaml::from_str(&text)?;
    let rows = rows.unwrap_or_default();
    let total = rows.len();
    let entries: Vec<ShelfEntry> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_yaml::from_value::<RawShelfEntry>(row) {
            Ok(raw) => raw.into_entry(),
            Err(e) => {
                tracing::warn!(
                    "Row {} of {} is malformed and skipped, quote decimal values: {}",
                    index + 1,
                    path.display(),
                    e
                );
                None
            }
        })
        .collect();

    if entries.len() < total {
        tracing::debug!(
            "{} of {} rows in {} are incomplete and skipped",
            total - entries.len(),
            total,
            path.display()
        );
    }

    Ok(Mapping { total, entries })
}
