//! Workbook sections.
//!
//! A directory of CSV files stands in for a multi-sheet workbook: each file
//! is one section, named by its file stem.

use std::path::{Path, PathBuf};

use rx_model::{ReorderError, Result};

/// One CSV section of a workbook directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// File stem (e.g., "RAW DATA").
    pub name: String,
    /// Path to the CSV file.
    pub path: PathBuf,
}

/// Lists all CSV sections in a directory.
///
/// Returns sections sorted by file name.
pub fn list_sections(dir: &Path) -> Result<Vec<Section>> {
    if !dir.is_dir() {
        return Err(ReorderError::MissingFile {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ReorderError::FileRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut sections = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| ReorderError::FileRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Check for .csv extension (case-insensitive)
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        sections.push(Section {
            name: name.to_string(),
            path: path.clone(),
        });
    }

    sections.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(sections)
}

/// Picks the section to read from `path`.
///
/// A plain file is used as-is. For a directory, the first section whose name
/// contains `pattern` (case-insensitive) is chosen; none matching is a schema
/// failure listing the available section names.
pub fn select_section(path: &Path, pattern: &str) -> Result<Section> {
    if path.is_file() {
        return Ok(file_section(path));
    }
    let sections = list_sections(path)?;
    let needle = pattern.to_lowercase();
    if let Some(found) = sections
        .iter()
        .find(|section| section.name.to_lowercase().contains(&needle))
    {
        return Ok(found.clone());
    }
    Err(ReorderError::MissingSection {
        path: path.to_path_buf(),
        pattern: pattern.to_string(),
        available: sections.into_iter().map(|section| section.name).collect(),
    })
}

/// Resolves a table path: files pass through, directories yield their first
/// section.
pub fn resolve_table_path(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let sections = list_sections(path)?;
    sections
        .into_iter()
        .next()
        .map(|section| section.path)
        .ok_or_else(|| ReorderError::empty(format!("workbook {}", path.display())))
}

fn file_section(path: &Path) -> Section {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();
    Section {
        name,
        path: path.to_path_buf(),
    }
}
