//! Source window resolution and cross-source confidence fusion.

mod contributing;
mod fusion;
mod window;

pub use contributing::ContributingSource;
pub use fusion::{ConfidenceFusion, DIVERSITY_BONUS_CAP, DIVERSITY_BONUS_STEP};
pub use window::{FamilyConfidenceParams, SourceFamily, TimeWindow, WindowPolicy};
