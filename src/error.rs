use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkoutError {
    #[error("IO error on `{}`: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Invalid metadata in `{}`: {}", .0.display(), .1)]
    Metadata(PathBuf, #[source] MetadataError),

    #[error("Error reading configuration file `{}`: {}", .0.display(), .1)]
    Config(PathBuf, String),

    #[error("Input directory is required (use --input or [paths] input_dir)")]
    MissingInput,

    #[error("Output directory `{}` contains the input directory `{}`", .0.display(), .1.display())]
    OutputContainsInput(PathBuf, PathBuf),
}

/// A recognized metadata key with a value that cannot be parsed.
#[derive(Debug, Error, PartialEq)]
pub enum MetadataError {
    #[error("invalid publishDate `{value}`: {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("invalid draft flag `{value}`, expected true or false")]
    InvalidBool { value: String },

    #[error("metadata block opened with `---` is never closed")]
    Unterminated,
}

pub type Result<T> = std::result::Result<T, MarkoutError>;
