//! Квантизация признаков для гистограммного поиска разбиений

#![allow(non_snake_case)]

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

/// Верхние границы бинов одного признака, по возрастанию.
#[derive(Debug, Clone)]
pub struct FeatureCuts {
    pub upper_bounds: Vec<f64>,
}

impl FeatureCuts {
    /// До `max_bins` бинов: каждое уникальное значение или квантили, если уникальных больше.
    pub fn from_values(values: impl Iterator<Item = f64>, max_bins: usize) -> Self {
        let mut unique: Vec<f64> = values.filter(|v| !v.is_nan()).collect();
        unique.sort_by(|a, b| a.total_cmp(b));
        unique.dedup();

        let max_bins = max_bins.clamp(1, u16::MAX as usize);
        let upper_bounds = if unique.len() <= max_bins {
            unique
        } else {
            let mut bounds: Vec<f64> = (1..=max_bins)
                .map(|i| unique[i * unique.len() / max_bins - 1])
                .collect();
            bounds.dedup();
            bounds
        };

        Self { upper_bounds }
    }

    pub fn n_bins(&self) -> usize {
        self.upper_bounds.len().max(1)
    }

    /// Индекс первого бина, верхняя граница которого не меньше значения.
    pub fn bin(&self, value: f64) -> u16 {
        let idx = self.upper_bounds.partition_point(|&b| b < value);
        idx.min(self.n_bins() - 1) as u16
    }

    /// Порог разбиения "левее или равно бину `bin`".
    pub fn threshold(&self, bin: usize) -> f64 {
        self.upper_bounds.get(bin).copied().unwrap_or(f64::INFINITY)
    }
}

/// Матрица номеров бинов (строки x признаки) и границы по каждому признаку.
#[derive(Debug, Clone)]
pub struct BinnedMatrix {
    pub bins: Array2<u16>,
    pub cuts: Vec<FeatureCuts>,
}

impl BinnedMatrix {
    pub fn build(X: ArrayView2<f64>, max_bins: usize) -> Self {
        let cuts: Vec<FeatureCuts> = (0..X.ncols())
            .into_par_iter()
            .map(|j| FeatureCuts::from_values(X.column(j).iter().copied(), max_bins))
            .collect();

        let mut bins = Array2::zeros((X.nrows(), X.ncols()));
        for ((i, j), bin) in bins.indexed_iter_mut() {
            *bin = cuts[j].bin(X[[i, j]]);
        }

        Self { bins, cuts }
    }

    pub fn n_rows(&self) -> usize {
        self.bins.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.bins.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn binary_feature_gets_two_bins() {
        let cuts = FeatureCuts::from_values([0.0, 1.0, 0.0, 1.0].into_iter(), 256);
        assert_eq!(cuts.upper_bounds, vec![0.0, 1.0]);
        assert_eq!(cuts.bin(0.0), 0);
        assert_eq!(cuts.bin(1.0), 1);
        assert_eq!(cuts.threshold(0), 0.0);
    }

    #[test]
    fn values_past_last_bound_land_in_last_bin() {
        let cuts = FeatureCuts::from_values([1.0, 2.0, 3.0].into_iter(), 256);
        assert_eq!(cuts.bin(-5.0), 0);
        assert_eq!(cuts.bin(2.5), 2);
        assert_eq!(cuts.bin(100.0), 2);
    }

    #[test]
    fn many_unique_values_are_quantized() {
        let cuts = FeatureCuts::from_values((0..1000).map(|v| v as f64), 10);
        assert_eq!(cuts.n_bins(), 10);
        assert_eq!(cuts.upper_bounds.last().copied(), Some(999.0));
        assert!(cuts.upper_bounds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn binned_matrix_matches_cuts() {
        let X = array![[0.0, 10.0], [1.0, 20.0], [0.0, 30.0]];
        let binned = BinnedMatrix::build(X.view(), 256);
        assert_eq!(binned.n_rows(), 3);
        assert_eq!(binned.n_features(), 2);
        assert_eq!(binned.bins.column(0).to_vec(), vec![0, 1, 0]);
        assert_eq!(binned.bins.column(1).to_vec(), vec![0, 1, 2]);
    }
}
