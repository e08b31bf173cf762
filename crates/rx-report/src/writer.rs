//! Atomic CSV writing.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, DataFrame};
use rx_common::any_to_string;

use crate::error::{ExportError, Result};

/// Temporary sibling of `path` (`<name>.tmp`).
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Cell text of every row, formatted the way the CSV is written.
///
/// Booleans become `TRUE`/`FALSE`, whole floats lose their fraction, nulls
/// are empty.
pub fn frame_rows(df: &DataFrame) -> Result<Vec<Vec<String>>> {
    let columns = df.get_columns();
    let rows = (0..df.height())
        .map(|idx| {
            columns
                .iter()
                .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
                .collect()
        })
        .collect();
    Ok(rows)
}

/// Writes `df` as CSV to `path` via a synced temp file and a rename.
///
/// On failure the temp file is removed and `path` is left untouched.
pub fn write_csv_atomic(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(df, &temp_path).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| ExportError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table written"
    );
    Ok(())
}

fn write_temp(df: &DataFrame, temp_path: &Path) -> Result<()> {
    let rows = frame_rows(df)?;
    let file = File::create(temp_path).map_err(|e| ExportError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    let csv_error = |source: csv::Error| ExportError::Csv {
        path: temp_path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_writer(&file);
    let header: Vec<String> = df
        .get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    writer.write_record(&header).map_err(csv_error)?;
    for row in &rows {
        writer.write_record(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| ExportError::Io {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    drop(writer);

    file.sync_all().map_err(|e| ExportError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};
    use tempfile::tempdir;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Item Code".into(), vec!["A1", "B2"]).into(),
            Series::new("Total Global Stock".into(), vec![15.0, 2.5]).into(),
            Series::new("Reorder Needed?".into(), vec![true, false]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/out/INVENTORY_CALCULATION.csv")),
            PathBuf::from("/out/INVENTORY_CALCULATION.csv.tmp")
        );
    }

    #[test]
    fn writes_formatted_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("lookup.csv");

        write_csv_atomic(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Item Code,Total Global Stock,Reorder Needed?\nA1,15,TRUE\nB2,2.5,FALSE\n"
        );
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn rewriting_is_byte_identical() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        write_csv_atomic(&sample(), &first).unwrap();
        write_csv_atomic(&sample(), &second).unwrap();
        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[test]
    fn failed_write_leaves_no_target() {
        let dir = tempdir().unwrap();
        // A directory in place of the target makes the rename fail.
        let path = dir.path().join("taken.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let err = write_csv_atomic(&sample(), &path).unwrap_err();
        assert!(matches!(err, ExportError::AtomicWriteFailed { .. }));
        assert!(!temp_path_for(&path).exists());
    }
}
