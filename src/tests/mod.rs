//! Internal test modules - whitebox tests with crate access
//!
//! Harness-based acceptance tests drive the real `TuiApp` over a
//! `TestBackend` and an in-process store.

mod acceptance_detail;
