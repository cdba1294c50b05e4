use crate::errors::TreeError;
use crate::node::Node;
use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

/// Append-only node store written by the tree builders.
///
/// Node `0` is the root. Children are always appended after their parent.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub n_features: usize,
    pub n_outputs: usize,
    /// Class count per output, `1` for each regression output.
    pub n_classes: Vec<usize>,
    pub max_depth: usize,
    pub n_leaves: usize,
}

impl Tree {
    pub fn new(n_features: usize, n_outputs: usize, n_classes: Vec<usize>) -> Self {
        Tree {
            nodes: Vec::new(),
            n_features,
            n_outputs,
            n_classes,
            max_depth: 0,
            n_leaves: 0,
        }
    }

    /// Reserve room for `capacity` nodes.
    pub fn reserve(&mut self, capacity: usize) {
        self.nodes.reserve(capacity.saturating_sub(self.nodes.len()));
    }

    /// Append a node and link it into its parent. Returns the new node id.
    ///
    /// Leaves ignore `feature` and `threshold`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_node(
        &mut self,
        parent: Option<usize>,
        is_left: bool,
        is_leaf: bool,
        feature: usize,
        threshold: f64,
        impurity: f64,
        n_node_samples: usize,
        weighted_n_node_samples: f64,
        value: Vec<f64>,
        depth: usize,
    ) -> usize {
        let num = self.nodes.len();
        if let Some(p) = parent {
            let parent_node = &mut self.nodes[p];
            if is_left {
                parent_node.left_child = num;
            } else {
                parent_node.right_child = num;
            }
        }
        let (feature, threshold) = if is_leaf { (0, 0.0) } else { (feature, threshold) };
        self.nodes.push(Node {
            num,
            parent,
            left_child: 0,
            right_child: 0,
            feature,
            threshold,
            impurity,
            n_node_samples,
            weighted_n_node_samples,
            depth,
            is_leaf,
            value,
        });
        if is_leaf {
            self.n_leaves += 1;
        }
        self.max_depth = self.max_depth.max(depth);
        num
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total weighted impurity decrease contributed by each feature.
    ///
    /// * `normalize` - Scale the importances so they sum to one.
    pub fn feature_importances(&self, normalize: bool) -> HashMap<usize, f64> {
        let mut importances: HashMap<usize, f64> = HashMap::new();
        let root_weight = match self.nodes.first() {
            Some(root) if root.weighted_n_node_samples > 0.0 => root.weighted_n_node_samples,
            _ => return importances,
        };
        for node in self.nodes.iter().filter(|n| !n.is_leaf) {
            let left = &self.nodes[node.left_child];
            let right = &self.nodes[node.right_child];
            let decrease = node.weighted_n_node_samples * node.impurity
                - left.weighted_n_node_samples * left.impurity
                - right.weighted_n_node_samples * right.impurity;
            *importances.entry(node.feature).or_insert(0.0) += decrease / root_weight;
        }
        if normalize {
            let total: f64 = importances.values().sum();
            if total > 0.0 {
                importances.values_mut().for_each(|v| *v /= total);
            }
        }
        importances
    }
}

impl Display for Tree {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<usize> = if self.nodes.is_empty() { Vec::new() } else { vec![0] };
        let mut r = String::new();
        while let Some(idx) = print_buffer.pop() {
            let node = &self.nodes[idx];
            r += format!("{}{}\n", "      ".repeat(node.depth).as_str(), node).as_str();
            if !node.is_leaf {
                print_buffer.push(node.right_child);
                print_buffer.push(node.left_child);
            }
        }
        write!(f, "{}", r)
    }
}

/// JSON persistence.
pub trait TreeIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save_tree<P: AsRef<Path>>(&self, path: P) -> Result<(), TreeError> {
        fs::write(path, self.json_dump()?).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object.
    fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Load from a json string.
    fn from_json(json_str: &str) -> Result<Self, TreeError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| TreeError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load_tree<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        let json_str = fs::read_to_string(path).map_err(|e| TreeError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl TreeIO for Tree {}
