pub mod proposal;
pub mod snapshot;
pub mod store;
pub mod traversal;

pub use proposal::EdgeProposal;
pub use snapshot::GraphSnapshot;
pub use store::EntityGraph;
pub use traversal::{LinkedDataset, Lineage};
