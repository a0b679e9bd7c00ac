// Crate root library declaration and module exports.
pub mod calendar_link;
pub mod config;
pub mod context;
pub mod controller;
pub mod expiry;
pub mod model;
pub mod projector;
pub mod schedule;
pub mod source;
