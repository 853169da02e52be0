//! Hint parser: explicit machine-readable directives embedded in step text.
//! Hints are authored intent and always win over pattern or learned matches.

pub mod parser;
pub mod types;
pub mod validate;

pub use parser::{extract_hints, parse_hints};
pub use types::{
    BehaviorHints, ExtractedHints, Hint, HintInconsistency, HintKey, InconsistencySeverity,
    LocatorHints, ParsedHints,
};
pub use validate::{module_hint_is_valid, validate_hints};
