use super::tree::Tree;
use crate::Matrix;
use rayon::prelude::*;

impl Tree {
    fn apply_row(&self, data: &Matrix<f64>, row: usize) -> usize {
        let mut node_idx = 0;
        loop {
            let node = &self.nodes[node_idx];
            if node.is_leaf {
                return node_idx;
            }
            node_idx = node.get_child_idx(*data.get(row, node.feature));
        }
    }

    /// Leaf reached by a row given as a slice of feature values.
    pub fn apply_row_from_row_slice(&self, row: &[f64]) -> usize {
        let mut node_idx = 0;
        loop {
            let node = &self.nodes[node_idx];
            if node.is_leaf {
                return node_idx;
            }
            node_idx = node.get_child_idx(row[node.feature]);
        }
    }

    fn apply_single_threaded(&self, data: &Matrix<f64>) -> Vec<usize> {
        (0..data.rows).map(|i| self.apply_row(data, i)).collect()
    }

    fn apply_parallel(&self, data: &Matrix<f64>) -> Vec<usize> {
        (0..data.rows).into_par_iter().map(|i| self.apply_row(data, i)).collect()
    }

    /// Id of the leaf each row of `data` falls into.
    pub fn apply(&self, data: &Matrix<f64>, parallel: bool) -> Vec<usize> {
        if self.nodes.is_empty() {
            return Vec::new();
        }
        if parallel {
            self.apply_parallel(data)
        } else {
            self.apply_single_threaded(data)
        }
    }

    /// Value of the leaf each row of `data` falls into.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Vec<Vec<f64>> {
        self.apply(data, parallel)
            .into_iter()
            .map(|leaf| self.nodes[leaf].value.clone())
            .collect()
    }

    fn decision_path_row(&self, data: &Matrix<f64>, row: usize) -> Vec<usize> {
        let mut node_idx = 0;
        let mut v = vec![node_idx];
        loop {
            let node = &self.nodes[node_idx];
            if node.is_leaf {
                break;
            }
            node_idx = node.get_child_idx(*data.get(row, node.feature));
            v.push(node_idx);
        }
        v
    }

    /// Ids of the nodes visited by each row, root first.
    pub fn decision_path(&self, data: &Matrix<f64>, parallel: bool) -> Vec<Vec<usize>> {
        if self.nodes.is_empty() {
            return Vec::new();
        }
        if parallel {
            (0..data.rows)
                .into_par_iter()
                .map(|i| self.decision_path_row(data, i))
                .collect()
        } else {
            (0..data.rows).map(|i| self.decision_path_row(data, i)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::tree::tests::small_tree;
    use crate::Matrix;

    #[test]
    fn test_apply_and_predict() {
        let t = small_tree();
        // Rows (1, 0), (2, 0), (2, 1), (1.5, 9).
        let data = vec![1.0, 2.0, 2.0, 1.5, 0.0, 0.0, 1.0, 9.0];
        let m = Matrix::new(&data, 4, 2);
        assert_eq!(t.apply(&m, false), vec![1, 3, 4, 1]);
        assert_eq!(t.apply(&m, true), t.apply(&m, false));
        assert_eq!(t.apply_row_from_row_slice(&[2.0, 1.0]), 4);
        let preds = t.predict(&m, true);
        assert_eq!(preds[0], vec![2.0, 0.0]);
        assert_eq!(preds[2], vec![0.0, 1.0]);
    }

    #[test]
    fn test_decision_path() {
        let t = small_tree();
        let data = vec![1.0, 2.0, 0.0, 1.0];
        let m = Matrix::new(&data, 2, 2);
        assert_eq!(t.decision_path(&m, false), vec![vec![0, 1], vec![0, 2, 4]]);
        assert_eq!(t.decision_path(&m, true), t.decision_path(&m, false));
    }
}
