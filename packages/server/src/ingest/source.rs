use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::SalesError;

/// Read every row of the sales export, header included.
///
/// Rows may differ in width; short rows are filtered later by the transformer
/// rather than failing the whole file here.
pub async fn read_rows(path: &Path) -> Result<Vec<StringRecord>, SalesError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SalesError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());

    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| SalesError::Csv {
            path: path.to_path_buf(),
            source,
        })
}
