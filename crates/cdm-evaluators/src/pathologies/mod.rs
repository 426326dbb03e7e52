//! One [`Guideline`](crate::guideline::Guideline) per supported pathology.

pub mod appendicitis;
pub mod cholecystitis;
pub mod diverticulitis;
pub mod pancreatitis;

pub use appendicitis::Appendicitis;
pub use cholecystitis::Cholecystitis;
pub use diverticulitis::Diverticulitis;
pub use pancreatitis::Pancreatitis;
