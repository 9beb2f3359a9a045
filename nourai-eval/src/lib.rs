//! Offline evaluation harness for the Nourai nutrition assistant.
//!
//! A reporting tool that replays a JSON set of test cases through a
//! [`RagPipeline`](nourai_rag::RagPipeline) and scores the answers:
//! BLEU-1..4 (smoothed), ROUGE-1/2/L, set-based retrieval precision and
//! recall, plus latency and coverage. Results aggregate into an
//! [`EvalReport`] that can be printed to the console or written as JSON.
//!
//! The harness consumes the core's outputs; it is not part of the core's
//! runtime contract.

pub mod bleu;
pub mod cases;
pub mod error;
pub mod report;
pub mod retrieval;
pub mod rouge;
pub mod runner;

pub use bleu::{BleuScores, bleu};
pub use cases::{TestCase, load_test_cases};
pub use error::{EvalError, Result};
pub use report::print_summary;
pub use retrieval::{RetrievalScores, precision_recall};
pub use rouge::{RougeScore, RougeScores, rouge};
pub use runner::{CaseResult, EvalAverages, EvalMetadata, EvalReport, run_evaluation};
