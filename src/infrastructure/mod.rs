pub mod clock;
pub mod formatter;
pub mod listeners;
pub mod value;

#[cfg(test)]
pub mod test_utils;

pub use clock::*;
pub use formatter::*;
pub use listeners::*;
pub use value::*;
