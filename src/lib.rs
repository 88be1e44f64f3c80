//! notestrip - Trainee Annotation Stripper
//!
//! notestrip walks a front-end source tree and deletes `/** ... */` comment
//! blocks that carry a sentinel phrase marking them as notes for trainees.
//! Files are selected by extension, dependency/build/VCS directories are
//! pruned, and only files whose text actually changed are rewritten.
//!
//! ## Limitations
//!
//! Blocks are located with a regular expression, not a JavaScript/TypeScript
//! lexer. Comment-like text inside string or template literals is matched
//! like any other text.

pub mod error;
pub mod logger;
pub mod patterns;
pub mod remover;
pub mod scanner;

// Re-export commonly used items
pub use error::StripError;
pub use patterns::{is_candidate, is_ignored_dir, BlockScope, IgnoreMatch, StripRules};
pub use remover::{MarkerRemover, Stripped, DEFAULT_SENTINEL};
pub use scanner::{candidate_files, process_file, run, FileOutcome, RunSummary, ScanOptions};
