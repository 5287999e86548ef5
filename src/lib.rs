//! Narrative Cast — character and collective extraction for story text.
//!
//! Finds the individuals and groups in free-form narrative without any
//! parsing model, using independent rule-driven detection passes whose
//! evidence is merged by canonical name, tiered by confidence, and linked
//! through a relationship graph and a timeline of group transitions.

pub mod core;
pub mod schema;

pub use crate::core::lexicon::{Lexicon, LexiconError};
pub use crate::core::pipeline::{CastDetector, CastDetectorBuilder, DetectError};
pub use crate::core::strategy::{Candidate, Strategy};
pub use crate::schema::report::DetectionReport;

/// Run detection with the built-in lexicon and default settings.
pub fn detect(text: &str) -> Result<DetectionReport, DetectError> {
    CastDetector::builder().build()?.detect(text)
}
