//! cvforge-core — the resume domain model and theme render engine.
//!
//! Everything in this crate is pure: no I/O, no async, no ambient clock.
//! The API server and the persistence client both build on these types.

pub mod io;
pub mod render;
pub mod resume;
pub mod validate;

pub use resume::{JsonResume, SectionId, SectionInfo, SECTIONS};
pub use render::{render, ThemeId, ThemeInfo, THEMES};
