//! GF(2^m) arithmetic: table construction, scalar elements, and the mandated
//! primitive polynomial for each supported field width.

pub mod element;
pub mod tables;

pub use element::Gf;
pub use tables::{primitive_poly, GfTables, MAX_M, MIN_M};
