//! End-to-end integration tests for NewsRAG
//!
//! The tests under `tests/` wire the session store, gateway, API wrappers
//! and router together against a mocked backend.
