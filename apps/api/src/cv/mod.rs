// CV versions: persistence, upload handling, and the HTTP handlers that tie the
// scoring engine, fix orchestrator, and renderer together.
pub mod handlers;
pub mod pending;
pub mod store;
pub mod upload;
pub mod version;
