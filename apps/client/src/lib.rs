//! cvforge-client — typed client for the cvforge API.
//!
//! Three layers: `api` wraps the HTTP surface with tri-state results,
//! `cache` adds invalidate-on-write caching with a single transport retry,
//! and `save` models the editor's debounced autosave as an explicit state
//! machine.

pub mod api;
pub mod cache;
pub mod save;
pub mod types;

pub use api::{ApiClient, ApiResponse, StaticTokenProvider, TokenProvider};
pub use cache::{CacheKey, CachingClient, ResourceCache, ResourceKind};
pub use save::{DebouncedSaver, SaveEvent, SaveState};

// Document import/export lives in core; re-exported so downstream apps
// only depend on this crate.
pub use cvforge_core::io::{export_json, import_json};
