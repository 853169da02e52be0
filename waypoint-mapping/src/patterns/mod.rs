//! Fixed pattern library and locator selection.

pub mod library;
pub mod locator;

pub use library::{PatternLibrary, PatternMatch, PatternRule};
pub use locator::{
    score_locator, LocatorSelection, LocatorSelector, DEFAULT_LOCATOR_PRIORITY,
};
