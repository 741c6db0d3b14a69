//! Chart renderers for cacheviz.
//!
//! Each public function maps one loaded experiment record to one PNG at a
//! fixed filename under the caller's output directory and returns the path it
//! wrote. Functions are independent and stateless; a rerun overwrites the
//! previous image. All drawing goes through `plotters` with a bitmap backend.

mod bars;

pub mod comparison;
pub mod improvement;
pub mod ml;
pub mod recovery;
pub mod scenario;
pub mod style;
pub mod table;
