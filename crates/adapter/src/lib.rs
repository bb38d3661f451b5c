pub mod adapter;
pub mod error;
pub mod mock;
pub mod topology;
pub mod types;

pub use adapter::{DynMASAdapter, MASAdapter};
pub use error::AdapterError;
pub use mock::MockAdapter;
pub use topology::derive_topology;
pub use types::{AgentHandle, AgentInfo, DirectResult, MemoryKind, ResourceUsage, WorkflowOptions, WorkflowResult};
