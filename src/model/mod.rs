// File: ./src/model/mod.rs
pub mod event;
pub mod normalize;

pub use event::{Category, Event, OdStatus};
pub use normalize::{normalize_row, parse_clock_time, RawRow};
