pub mod engine;
pub mod format;
pub mod theme;

pub use engine::render;
pub use theme::{ThemeId, ThemeInfo, UnknownTheme, THEMES};
