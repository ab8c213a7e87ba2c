#![forbid(unsafe_code)]

// The graph is filled in one pass per dump file, afterwards it is only read
// by the topology and demand analyses.

pub mod store;
pub mod graph;
pub mod error;
pub mod ingestion;
pub mod analyzer;
pub mod topology;
pub mod demand;

pub use self::graph::{Network, NetworkStats, Node, Channel, Edge};
pub use self::error::{LoadError, PreconditionError};
pub use self::ingestion::{ingest, check_file_kind, check_prerequisites, LoadSettings, Progress, IngestStats};
pub use self::analyzer::{Analyzer, LoadState, Observed, Summary};
pub use self::topology::{Topology, TopologyRequest, TopologyEdge, LayoutHints};
pub use self::demand::{estimate, DemandMap, DemandMetric};
