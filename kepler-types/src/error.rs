//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, PartialEq)]
pub enum KeplerTypesError {
    /// Edge insets must be built from exactly four components.
    #[error("edge insets require 4 components, got {0}")]
    InsetsLength(usize),
    /// Latitude is outside of `[-90, 90]` degrees.
    #[error("latitude {0} is out of range")]
    Latitude(f64),
}
