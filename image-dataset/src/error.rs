//! Error types of the dataset.

use crate::codec::CodecError;
use std::{io, num::ParseIntError, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read manifest file '{}'", .path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "{}:{line}: file format error, expect '<image-path> <label>[,<label>...]'",
        .path.display()
    )]
    ManifestFormat { path: PathBuf, line: usize },
    #[error("{}:{line}: invalid label '{token}'", .path.display())]
    InvalidLabel {
        path: PathBuf,
        line: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },
    #[error("can not open image '{}'", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("failed to read config file '{}'", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file '{}'", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    #[error("index {index} is out of range for a dataset of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error(transparent)]
    Tensor(#[from] tch::TchError),
}

/// Return early with [Error::Configuration] if the condition does not hold.
macro_rules! ensure_config {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::Error::Configuration(format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_config;
