/// Типы данных для обучения и инференса

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Табличные данные: именованные колонки строковых значений одинаковой длины.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Собирает таблицу из колонок. Все колонки должны иметь одинаковую длину.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let n_rows = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
                return Err(PlannerError::ShapeMismatch(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.values.len(),
                    n_rows
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Собирает таблицу из заголовка и строк (построчное представление CSV).
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(PlannerError::ShapeMismatch(format!(
                    "row {} has {} fields, expected {}",
                    i,
                    row.len(),
                    columns.len()
                )));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.values.push(value);
            }
        }

        Ok(Self { columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Result<&[String]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| PlannerError::ColumnNotFound(name.to_string()))
    }

    /// Числовая колонка. Пустые, нечисловые и бесконечные значения (NaN, inf) - ошибка.
    pub fn numeric_column(&self, name: &str) -> Result<Array1<f64>> {
        let values = self.column(name)?;
        values
            .iter()
            .enumerate()
            .map(|(row, raw)| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| PlannerError::InvalidNumber {
                        column: name.to_string(),
                        row,
                        value: raw.clone(),
                    })
            })
            .collect()
    }

    /// Новая таблица только с указанными колонками в указанном порядке.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|name| -> Result<Column> {
                let name = name.as_ref();
                Ok(Column {
                    name: name.to_string(),
                    values: self.column(name)?.to_vec(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Table { columns })
    }
}

/// Запрос на одно предсказание.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropQuery {
    pub crop: String,
    pub seed_type: String,
    pub soil: String,
    pub district: String,
    pub season: String,
}

impl CropQuery {
    /// Значение признака по имени колонки обучающей таблицы.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "crop" => Some(self.crop.as_str()),
            "seed_type" => Some(self.seed_type.as_str()),
            "soil" => Some(self.soil.as_str()),
            "district" => Some(self.district.as_str()),
            "season" => Some(self.season.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetPrediction {
    pub target: String,
    pub value: f64,
}

/// Результат предсказания: по строке на вход, по колонке на целевую переменную.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionTable {
    pub targets: Vec<String>,
    pub values: Array2<f64>,
}

impl PredictionTable {
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn column(&self, target: &str) -> Option<Array1<f64>> {
        self.targets
            .iter()
            .position(|t| t == target)
            .map(|idx| self.values.column(idx).to_owned())
    }

    pub fn row(&self, row: usize) -> Vec<TargetPrediction> {
        self.targets
            .iter()
            .zip(self.values.row(row).iter())
            .map(|(target, &value)| TargetPrediction {
                target: target.clone(),
                value,
            })
            .collect()
    }
}
