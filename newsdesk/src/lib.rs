// Library interface for newsdesk modules
// This allows tests and the binary to import modules

pub mod analysis;
pub mod ingestion;
pub mod processing;
pub mod server;
pub mod sources;
