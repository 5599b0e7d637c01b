pub mod builder;
pub mod emitter;
pub mod id;
pub mod identity;
pub mod model;
pub mod parser;
pub mod path;
pub mod sizing;

pub use builder::{build_graph, parse_graph};
pub use emitter::emit_document;
pub use id::NodeId;
pub use identity::{DEFAULT_COLOR, Identity, infer_identity};
pub use model::*;
pub use parser::parse_jsonc;
pub use path::{JsonPath, Segment};
pub use sizing::{GraphConfig, NodeDimensions};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
