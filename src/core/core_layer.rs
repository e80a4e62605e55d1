// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "markdown/mod.rs"]
pub mod markdown;

#[path = "documents/mod.rs"]
pub mod documents;
