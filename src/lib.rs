//! Purpose: Library crate backing the `widget-unpack` CLI and its tests.
//! Exports: `api` (stable surface) and `core` (collection, decoding, extraction, errors).
//! Role: Turns widget/bundle JSON exports into an editable source tree.
//! Invariants: Every operation takes its output directory explicitly; no process-wide paths.
//! Invariants: Handled failures are returned in a `Summary`, never printed by the library.
pub mod api;
pub mod core;
