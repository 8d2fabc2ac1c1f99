//! Tempo, pause and time signature handling.
//!
//! `OpenTimingBuilder` collects events while the chart is read;
//! `SealedTimingTable` is the frozen result that maps positions to time.

mod builder;
mod table;

pub use builder::OpenTimingBuilder;
pub use table::SealedTimingTable;
