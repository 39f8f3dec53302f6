//! Currency resolver errors

use thiserror::Error;

use core_kernel::PortError;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The country/currency directory could not be reached or decoded.
    /// The resolver keeps echoing raw codes when this happens.
    #[error("Currency directory unavailable: {0}")]
    DirectoryUnavailable(#[from] PortError),

    #[error("Currency directory returned no currencies")]
    Empty,
}
