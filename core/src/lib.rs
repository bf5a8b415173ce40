pub mod index;
pub mod job;
pub mod plan;
pub mod record;
pub mod resolve;
pub mod shuffle;
pub mod sink;

pub use index::DocumentIndex;
pub use record::{IndexRecord, PartitionRange};
