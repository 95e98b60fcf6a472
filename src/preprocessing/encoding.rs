//! One-hot кодирование категориальных признаков

#![allow(non_snake_case)]

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::types::Table;

/// Поведение при категории, не встречавшейся при обучении.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategory {
    /// Нулевой блок вместо ошибки.
    #[default]
    Ignore,
    Error,
}

/// Словарь одной колонки. Категории отсортированы.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub column: String,
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit(column: &str, values: &[String]) -> Self {
        let categories: BTreeSet<&String> = values.iter().collect();
        Self {
            column: column.to_string(),
            categories: categories.into_iter().cloned().collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }
}

/// Кодировщик набора колонок: блоки one-hot идут в порядке колонок.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    encoders: Vec<OneHotEncoder>,
    handle_unknown: UnknownCategory,
}

impl CategoricalEncoder {
    pub fn fit(features: &Table, handle_unknown: UnknownCategory) -> Result<Self> {
        if features.n_rows() == 0 {
            return Err(PlannerError::EmptyDataset);
        }

        let encoders = features
            .column_names()
            .map(|name| -> Result<OneHotEncoder> {
                Ok(OneHotEncoder::fit(name, features.column(name)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            encoders,
            handle_unknown,
        })
    }

    pub fn n_output_features(&self) -> usize {
        self.encoders.iter().map(|e| e.width()).sum()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.iter().map(|e| e.column.as_str())
    }

    /// Имена выходных признаков `<колонка>_<категория>`.
    pub fn feature_names(&self) -> Vec<String> {
        self.encoders
            .iter()
            .flat_map(|e| {
                e.categories
                    .iter()
                    .map(move |c| format!("{}_{}", e.column, c))
            })
            .collect()
    }

    /// Колонки ищутся по имени, лишние колонки таблицы игнорируются.
    pub fn transform(&self, table: &Table) -> Result<Array2<f64>> {
        let mut encoded = Array2::zeros((table.n_rows(), self.n_output_features()));

        let mut offset = 0;
        for encoder in &self.encoders {
            let values = table.column(&encoder.column)?;
            for (row, value) in values.iter().enumerate() {
                match encoder.index_of(value) {
                    Some(idx) => encoded[[row, offset + idx]] = 1.0,
                    None => self.on_unknown(encoder, value)?,
                }
            }
            offset += encoder.width();
        }

        Ok(encoded)
    }

    /// Кодирование одной строки, значения берутся через `lookup` по имени колонки.
    pub fn transform_row<'a, F>(&self, lookup: F) -> Result<Array2<f64>>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut encoded = Array2::zeros((1, self.n_output_features()));

        let mut offset = 0;
        for encoder in &self.encoders {
            let value = lookup(encoder.column.as_str())
                .ok_or_else(|| PlannerError::ColumnNotFound(encoder.column.clone()))?;
            match encoder.index_of(value) {
                Some(idx) => encoded[[0, offset + idx]] = 1.0,
                None => self.on_unknown(encoder, value)?,
            }
            offset += encoder.width();
        }

        Ok(encoded)
    }

    fn on_unknown(&self, encoder: &OneHotEncoder, value: &str) -> Result<()> {
        match self.handle_unknown {
            UnknownCategory::Ignore => Ok(()),
            UnknownCategory::Error => Err(PlannerError::UnknownCategory {
                column: encoder.column.clone(),
                value: value.to_string(),
            }),
        }
    }
}
