//! Test module for couchdeck-core
//!
//! Covers the pieces that only make sense together:
//! - Layout geometry invariants
//! - Directional navigation and wrap policy
//! - Reconciliation applied to live collections
//! - Grid ordering, reload and deferred selection
//! - View transitions and focus anchors
//! - Modal show/hide, deferred work cancellation and auto-hide
//! - Configuration loading

// Test modules use exact float comparisons and test-specific casts
#![allow(clippy::float_cmp, clippy::cast_possible_truncation)]

mod modal_tests;
mod ordering_tests;
