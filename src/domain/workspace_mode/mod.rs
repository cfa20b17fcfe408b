//! Single/multi-project workspace mode scoring.

mod mode;
mod scorer;

pub use mode::{ModeBand, ModeSettings, ProjectMode, WorkspaceMode};
pub use scorer::{ModeBandPolicy, ModeObservation, ModeRecommendation, ModeScorer};
