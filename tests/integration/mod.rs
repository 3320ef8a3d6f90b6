//! Integration tests for vigil's monitoring pipeline
//!
//! These tests exercise the full fetch → diff → persist → report cycle with
//! scripted collaborators, plus shutdown behavior across multiple monitors.

pub mod monitor_loop;
pub mod multi_watch;
pub mod snapshot_store;
