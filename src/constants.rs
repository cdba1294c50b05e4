/// Two feature values closer than this are treated as equal when scanning
/// for thresholds or deciding that a feature is constant in a node.
pub const FEATURE_THRESHOLD: f64 = 1e-7;
/// Nodes whose impurity is at or below this value are never split.
pub const MIN_IMPURITY_SPLIT: f64 = 1e-7;
/// Depth-first trees with `max_depth` above this start from a fixed node capacity.
pub const MAX_DEPTH_PREALLOC: usize = 10;
/// Node capacity reserved when the depth or leaf bound is too large to size exactly.
pub const DEFAULT_NODE_CAPACITY: usize = 2047;
