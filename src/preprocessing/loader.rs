//! Загрузка датасета из CSV

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PlannerError, Result};
use crate::types::Table;

/// Читает CSV с заголовком в таблицу.
///
/// Отсутствующий файл возвращает `PlannerError::InputNotFound` до начала разбора.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PlannerError::InputNotFound(path.to_path_buf()),
        _ => PlannerError::Io(e),
    })?;

    let mut reader = csv::Reader::from_reader(file);
    // Имена колонок как в файле, без обрезки пробелов
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    tracing::debug!("Loaded {} rows x {} columns from {}", rows.len(), headers.len(), path.display());

    Table::from_rows(headers, rows)
}
