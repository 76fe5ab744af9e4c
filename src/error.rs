// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types returned by this crate's fallible entry points.

use thiserror::Error;

/// Errors produced by the geometry primitives and the tree container.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RTreeError {
    /// A rectangle was constructed or inserted with `min > max` on some axis.
    #[error("invalid rectangle: min ({min_x}, {min_y}) must not exceed max ({max_x}, {max_y})")]
    InvalidRectangle {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    /// A tree was constructed with a fanout that cannot satisfy `2 <= M`, `1 <= m <= ceil(M/2)`.
    #[error(
        "invalid fanout: max_entries={max_entries}, min_entries={min_entries} (require max_entries >= 2 and 1 <= min_entries <= ceil(max_entries/2))"
    )]
    InvalidFanout {
        max_entries: usize,
        min_entries: usize,
    },

    /// A strategy violated its contract: returned a foreign node, failed to shrink an
    /// overflowing node, or otherwise left an invariant broken. Only ever raised from
    /// debug-assertion checks; strategy misbehavior is a programmer error.
    #[error("strategy contract violation: {0}")]
    StrategyContractViolation(String),
}
