//! Chart data model.
//!
//! - `DefId`, `RawDatum` - channel events as written in the chart
//! - `Channel` - recognized channel codes
//! - `Key`, `KeyLayout`, `GameMode` - lanes and output column mapping
//! - `NotefieldBuilder`, `NotefieldObject` - resolved playable objects
//! - `resolve_offsets` - time signature rescaling of datum positions
//! - `Difficulty`, `ChartMetadata` - descriptive fields

mod channel;
mod datum;
mod def_id;
mod difficulty;
mod lane;
mod metadata;
mod notefield;
mod offset;

pub use channel::*;
pub use datum::*;
pub use def_id::*;
pub use difficulty::*;
pub use lane::*;
pub use metadata::*;
pub use notefield::*;
pub use offset::*;
