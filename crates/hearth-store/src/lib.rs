//! Local durable key/value cache.
//!
//! Backs the conversation log and search flag with one JSON file per key
//! under a data directory. The cache is deliberately forgiving: a missing
//! or malformed payload reads as absent, and write failures are logged
//! rather than surfaced, because in-memory state is always authoritative.
//!
//! There is no versioning or migration scheme, and concurrent processes
//! sharing a directory race last-writer-wins.

pub mod cache;

pub use cache::FileCache;
