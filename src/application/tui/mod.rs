pub mod picker_view;
pub mod text;
pub mod theme;

pub use picker_view::*;
pub use text::*;
pub use theme::*;
