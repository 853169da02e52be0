//! Learned pattern store (LLKB): persisted, confidence-scored step mappings
//! with a success/failure learning loop and pruning.

pub mod store;
pub mod types;

pub use store::LlkbStore;
pub use types::{
    LearnedPattern, LlkbDiagnostics, StoreDocument, CONFIDENCE_CAP, CONFIDENCE_FLOOR,
    FAILURE_DELTA, INITIAL_CONFIDENCE, STORE_FILE, STORE_VERSION, SUCCESS_DELTA,
};
