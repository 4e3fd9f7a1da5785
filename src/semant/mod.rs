//! Checking proofs: the rule table, per-line verdicts and the search for
//! missing justifications.

mod check_proof;
pub mod proof_status;
pub mod rules;
pub mod search;

pub use proof_status::{LineStatus, ProofStatuses};
pub use rules::verifies;
pub use search::{SearchReport, SearchStep};
