//! CSV file reading.

use std::path::Path;

use polars::prelude::*;
use rx_model::{ReorderError, Result};

/// Fails with [`ReorderError::MissingFile`] when `path` does not exist.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ReorderError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

/// Reads a CSV file into a DataFrame with every column typed as text.
///
/// A zero-byte file is reported as [`ReorderError::EmptyDataset`]; a header
/// without rows loads as a zero-height frame and is left to the caller.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReorderError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ReorderError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if metadata.len() == 0 {
        return Err(ReorderError::empty(path.display().to_string()));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| ReorderError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| ReorderError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    strip_bom(&mut df)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "csv loaded"
    );
    Ok(df)
}

/// Removes a UTF-8 BOM that leaked into the first header name.
fn strip_bom(df: &mut DataFrame) -> Result<()> {
    let Some(first) = df.get_column_names_owned().into_iter().next() else {
        return Ok(());
    };
    if let Some(clean) = first.as_str().strip_prefix('\u{feff}') {
        let clean = clean.to_string();
        df.rename(first.as_str(), clean.into())?;
    }
    Ok(())
}
