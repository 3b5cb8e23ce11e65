//! End-to-end tests against live providers
//!
//! Ignored by default; run with `cargo test -- --ignored` and the provider's
//! API key in the environment.
