pub mod calendar;
pub mod day;
pub mod grid;
pub mod options;
pub mod range;

pub use day::*;
pub use grid::*;
pub use options::*;
pub use range::*;
