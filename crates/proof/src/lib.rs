//! Settlement proof interface.
//!
//! The proof system itself is an external black box; this crate defines the
//! statements we ask it to attest, the opaque artifacts it returns, and a
//! native backend that stands in for it outside proving environments.

mod backend;
mod errors;
mod native;
mod statement;

pub use backend::ProofBackend;
pub use errors::{ProofError, ProofResult};
pub use native::NativeBackend;
pub use statement::{ChunkProof, ChunkStatement, SettlementProof};
