//! Errors raised while scanning and rewriting files.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StripError {
    /// A candidate file could not be opened for reading or writing.
    #[error("cannot access {}: {}", .path.display(), .source)]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A candidate file is not valid UTF-8.
    #[error("{} is not valid UTF-8: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    /// The walker failed to enumerate an entry under the scan root.
    #[error("failed to traverse {}: {}", .root.display(), .source)]
    Traversal {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// The sentinel phrase could not be turned into a matcher.
    #[error("invalid sentinel pattern: {0}")]
    Pattern(#[from] regex::Error),
}
