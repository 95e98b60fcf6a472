//! Дерево регрессии для градиентного бустинга

#![allow(non_snake_case)]

use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::binning::BinnedMatrix;

/// Минимальный выигрыш, при котором разбиение имеет смысл.
const MIN_GAIN_EPS: f64 = 1e-6;

/// Параметры роста одного дерева.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub learning_rate: f64,
    pub reg_lambda: f64,
    pub min_split_gain: f64,
    pub min_child_weight: f64,
}

impl TreeParams {
    /// gain = 0.5 * [GL²/(HL+λ) + GR²/(HR+λ) - GP²/(HP+λ)] - γ
    fn split_gain(&self, gl: f64, hl: f64, gr: f64, hr: f64) -> f64 {
        let score = |g: f64, h: f64| g * g / (h + self.reg_lambda);
        0.5 * (score(gl, hl) + score(gr, hr) - score(gl + gr, hl + hr)) - self.min_split_gain
    }

    /// Шаг Ньютона, уменьшенный на learning_rate.
    fn leaf_weight(&self, g: f64, h: f64) -> f64 {
        -g / (h + self.reg_lambda) * self.learning_rate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    bin: usize,
    gain: f64,
}

impl SplitCandidate {
    /// При равном выигрыше побеждает меньший индекс признака.
    fn better_than(&self, other: &SplitCandidate) -> bool {
        self.gain > other.gain || (self.gain == other.gain && self.feature < other.feature)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
}

impl RegressionTree {
    /// Рост дерева по градиентам и гессианам строк `rows`.
    pub fn grow(
        binned: &BinnedMatrix,
        grad: &[f64],
        hess: &[f64],
        rows: Vec<usize>,
        params: &TreeParams,
    ) -> Self {
        let grower = Grower {
            binned,
            grad,
            hess,
            params,
        };
        Self {
            root: grower.build_node(rows, 0),
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }

    pub fn predict_row(&self, sample: ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold { left.as_ref() } else { right.as_ref() };
                }
            }
        }
    }

    pub fn predict(&self, X: ArrayView2<f64>) -> Array1<f64> {
        X.rows().into_iter().map(|row| self.predict_row(row)).collect()
    }
}

struct Grower<'a> {
    binned: &'a BinnedMatrix,
    grad: &'a [f64],
    hess: &'a [f64],
    params: &'a TreeParams,
}

impl Grower<'_> {
    fn build_node(&self, rows: Vec<usize>, depth: usize) -> TreeNode {
        let (g, h) = rows
            .iter()
            .fold((0.0, 0.0), |(g, h), &r| (g + self.grad[r], h + self.hess[r]));

        if depth >= self.params.max_depth || rows.len() < 2 {
            return TreeNode::Leaf {
                value: self.params.leaf_weight(g, h),
            };
        }

        let best = match self.find_best_split(&rows, g, h) {
            Some(best) => best,
            None => {
                return TreeNode::Leaf {
                    value: self.params.leaf_weight(g, h),
                }
            }
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&r| (self.binned.bins[[r, best.feature]] as usize) <= best.bin);

        TreeNode::Split {
            feature: best.feature,
            threshold: self.binned.cuts[best.feature].threshold(best.bin),
            left: Box::new(self.build_node(left_rows, depth + 1)),
            right: Box::new(self.build_node(right_rows, depth + 1)),
        }
    }

    fn find_best_split(&self, rows: &[usize], g: f64, h: f64) -> Option<SplitCandidate> {
        (0..self.binned.n_features())
            .into_par_iter()
            .filter_map(|feature| self.best_split_for_feature(feature, rows, g, h))
            .reduce_with(|a, b| if b.better_than(&a) { b } else { a })
    }

    fn best_split_for_feature(
        &self,
        feature: usize,
        rows: &[usize],
        g: f64,
        h: f64,
    ) -> Option<SplitCandidate> {
        let n_bins = self.binned.cuts[feature].n_bins();
        if n_bins < 2 {
            return None;
        }

        // Гистограмма (сумма градиентов, сумма гессианов) по бинам
        let mut hist = vec![(0.0, 0.0); n_bins];
        for &r in rows {
            let slot = &mut hist[self.binned.bins[[r, feature]] as usize];
            slot.0 += self.grad[r];
            slot.1 += self.hess[r];
        }

        let mut best: Option<SplitCandidate> = None;
        let (mut gl, mut hl) = (0.0, 0.0);
        for (bin, &(bg, bh)) in hist.iter().enumerate().take(n_bins - 1) {
            gl += bg;
            hl += bh;
            let (gr, hr) = (g - gl, h - hl);
            if hl < self.params.min_child_weight || hr < self.params.min_child_weight {
                continue;
            }

            let gain = self.params.split_gain(gl, hl, gr, hr);
            if gain > MIN_GAIN_EPS && best.map_or(true, |b| gain > b.gain) {
                best = Some(SplitCandidate { feature, bin, gain });
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            learning_rate: 1.0,
            reg_lambda: 0.0,
            min_split_gain: 0.0,
            min_child_weight: 1.0,
        }
    }

    /// Градиенты квадратичной функции потерь при нулевом предсказании.
    fn gradients(y: &[f64]) -> (Vec<f64>, Vec<f64>) {
        (y.iter().map(|v| -v).collect(), vec![1.0; y.len()])
    }

    #[test]
    fn single_split_separates_groups() {
        let X = array![[0.0], [0.0], [1.0], [1.0]];
        let y = [2.0, 2.0, 8.0, 8.0];
        let (grad, hess) = gradients(&y);
        let binned = BinnedMatrix::build(X.view(), 256);

        let tree = RegressionTree::grow(&binned, &grad, &hess, (0..4).collect(), &params(3));
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(X.view()).to_vec(), vec![2.0, 2.0, 8.0, 8.0]);
    }

    #[test]
    fn depth_limit_is_respected() {
        let X = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0]];
        let y: Vec<f64> = (0..8).map(|v| (v * v) as f64).collect();
        let (grad, hess) = gradients(&y);
        let binned = BinnedMatrix::build(X.view(), 256);

        let tree = RegressionTree::grow(&binned, &grad, &hess, (0..8).collect(), &params(2));
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn constant_target_yields_single_leaf() {
        let X = array![[0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
        let (grad, hess) = gradients(&[3.0, 3.0, 3.0]);
        let binned = BinnedMatrix::build(X.view(), 256);

        let tree = RegressionTree::grow(&binned, &grad, &hess, (0..3).collect(), &params(5));
        assert_eq!(tree.root(), &TreeNode::Leaf { value: 3.0 });
    }

    #[test]
    fn ties_pick_lowest_feature() {
        // Оба признака одинаково хорошо разделяют цель
        let X = array![[0.0, 0.0], [0.0, 0.0], [1.0, 1.0], [1.0, 1.0]];
        let (grad, hess) = gradients(&[1.0, 1.0, 5.0, 5.0]);
        let binned = BinnedMatrix::build(X.view(), 256);

        let tree = RegressionTree::grow(&binned, &grad, &hess, (0..4).collect(), &params(1));
        match tree.root() {
            TreeNode::Split { feature, .. } => assert_eq!(*feature, 0),
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn unseen_values_follow_thresholds() {
        let X = array![[1.0], [2.0], [10.0], [11.0]];
        let (grad, hess) = gradients(&[0.0, 0.0, 4.0, 4.0]);
        let binned = BinnedMatrix::build(X.view(), 256);

        let tree = RegressionTree::grow(&binned, &grad, &hess, (0..4).collect(), &params(1));
        assert_eq!(tree.predict_row(array![-3.0].view()), 0.0);
        assert_eq!(tree.predict_row(array![50.0].view()), 4.0);
    }
}
