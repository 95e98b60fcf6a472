//! Разделение таблицы на признаки и целевые переменные

#![allow(non_snake_case)]

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Table;

/// Категориальные признаки модели.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub columns: Vec<String>,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self {
            columns: ["crop", "seed_type", "soil", "district", "season"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FeatureSpec {
    /// Таблица признаков. Отсутствие любой колонки - ошибка.
    pub fn select(&self, table: &Table) -> Result<Table> {
        table.select(&self.columns)
    }
}

/// Правило поиска целевых колонок: колонка длительности, затем группы суффиксов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSpec {
    pub duration_column: String,
    pub suffix_groups: Vec<Vec<String>>,
}

impl Default for TargetSpec {
    fn default() -> Self {
        let group = |suffixes: &[&str]| -> Vec<String> { suffixes.iter().map(|s| s.to_string()).collect() };
        Self {
            duration_column: "total_duration_estimate".to_string(),
            suffix_groups: vec![
                group(&["_tmin", "_tmax", "_rh", "_rain", "_wind", "_solar_rad"]),
                group(&["_stage_dur"]),
            ],
        }
    }
}

impl TargetSpec {
    /// Порядок: колонка длительности, затем каждая группа в порядке колонок таблицы.
    /// Колонка не попадает в список дважды.
    pub fn discover(&self, table: &Table) -> Vec<String> {
        let mut targets = vec![self.duration_column.clone()];

        for suffixes in &self.suffix_groups {
            for name in table.column_names() {
                if targets.iter().any(|t| t == name) {
                    continue;
                }
                if suffixes.iter().any(|suffix| name.ends_with(suffix.as_str())) {
                    targets.push(name.to_string());
                }
            }
        }

        targets
    }

    /// Числовая матрица целевых переменных (строки x цели).
    pub fn matrix(&self, table: &Table, targets: &[String]) -> Result<Array2<f64>> {
        let mut Y = Array2::zeros((table.n_rows(), targets.len()));
        for (j, name) in targets.iter().enumerate() {
            let values = table.numeric_column(name)?;
            Y.column_mut(j).assign(&values);
        }
        Ok(Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    fn table(headers: &[&str]) -> Table {
        let row: Vec<String> = headers.iter().map(|_| "1".to_string()).collect();
        Table::from_rows(headers.iter().map(|h| h.to_string()).collect(), vec![row]).unwrap()
    }

    #[test]
    fn discovers_duration_then_environment_then_stage_durations() {
        let table = table(&[
            "crop",
            "sowing_stage_dur",
            "sowing_tmin",
            "total_duration_estimate",
            "sowing_rain",
            "harvest_stage_dur",
            "harvest_solar_rad",
            "district",
        ]);

        let targets = TargetSpec::default().discover(&table);
        assert_eq!(
            targets,
            vec![
                "total_duration_estimate",
                "sowing_tmin",
                "sowing_rain",
                "harvest_solar_rad",
                "sowing_stage_dur",
                "harvest_stage_dur",
            ]
        );
    }

    #[test]
    fn discovery_is_deterministic() {
        let table = table(&["a_rh", "total_duration_estimate", "b_wind", "a_stage_dur"]);
        let spec = TargetSpec::default();
        assert_eq!(spec.discover(&table), spec.discover(&table));
    }

    #[test]
    fn column_listed_once_even_if_two_groups_match() {
        let spec = TargetSpec {
            duration_column: "total".to_string(),
            suffix_groups: vec![vec!["_dur".to_string()], vec!["_stage_dur".to_string()]],
        };
        let table = table(&["x_stage_dur", "total"]);
        assert_eq!(spec.discover(&table), vec!["total", "x_stage_dur"]);
    }

    #[test]
    fn matrix_fails_on_missing_column() {
        let table = table(&["a_rh"]);
        let spec = TargetSpec::default();
        let targets = spec.discover(&table);
        assert!(matches!(
            spec.matrix(&table, &targets),
            Err(PlannerError::ColumnNotFound(name)) if name == "total_duration_estimate"
        ));
    }

    #[test]
    fn feature_select_fails_on_missing_column() {
        let table = table(&["crop", "seed_type", "soil", "district"]);
        assert!(matches!(
            FeatureSpec::default().select(&table),
            Err(PlannerError::ColumnNotFound(name)) if name == "season"
        ));
    }
}
