//! Output writers: StepMania chart text and referenced image files.

mod files;
mod sm;

pub use files::*;
pub use sm::*;
