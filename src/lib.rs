// Modules
pub mod builder;
pub mod constants;
pub mod criterion;
pub mod data;
pub mod decision_tree;
pub mod errors;
pub mod grower;
pub mod node;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use builder::{BestFirstTreeBuilder, BuilderParams, DepthFirstBuilder, TreeBuilder};
pub use criterion::{Criterion, CriterionKind};
pub use data::Matrix;
pub use decision_tree::config::{DecisionTreeConfig, MaxFeatures};
pub use decision_tree::core::DecisionTree;
pub use errors::TreeError;
pub use grower::GrowPolicy;
pub use splitter::{BestSplitter, PresortBestSplitter, RandomSplitter, SplitRecord, Splitter, SplitterKind};
pub use tree::tree::{Tree, TreeIO};
