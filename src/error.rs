//! Definition of columbite's error and result.

use std::io;

use thiserror::Error;

/// The library's error enum.
#[derive(Debug, Error)]
pub enum ColumbiteError {
    /// Invalid argument was passed by the user.
    ///
    /// This covers configuration errors detected while preparing a query:
    /// a scoring slot reporting an impossible buffer layout for instance.
    #[error("An invalid argument was passed: '{0}'")]
    InvalidArgument(String),
    /// IO Error.
    ///
    /// The core itself never blocks on IO; this variant exists for the
    /// term-iterator/codec implementations sitting behind the reader traits.
    #[error("An IO error occurred: '{0}'")]
    Io(#[from] io::Error),
    /// An invariant of the core was violated by a collaborator.
    #[error("Internal error: '{0}'")]
    Internal(String),
}
