//! Core library for cacheviz: the experiment result schema, discovery of
//! result artifacts on disk, and the pure aggregation arithmetic the chart
//! renderers consume.
//!
//! Nothing in this crate draws anything or holds state beyond one loaded
//! [`model::ExperimentRecord`]; every aggregation entry point is a pure
//! function so the chart layer stays a thin mapping from numbers to pixels.

pub mod aggregate;
pub mod model;
pub mod source;
