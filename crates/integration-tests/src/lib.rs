//! Integration tests for `GoDairy`.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and the API server
//! cargo run -p godairy-api
//!
//! # Run integration tests
//! cargo test -p godairy-integration-tests -- --ignored
//! ```
//!
//! Tests live under `tests/` and are `#[ignore]`d by default because they
//! need a running server and database.
