//! Error types for jcontacts-core

use thiserror::Error;

/// Failure while reading or writing the user-data document.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing element: <{0}>")]
    MissingElement(&'static str),

    #[error("Unclosed element at end of document")]
    UnclosedElement,

    #[error("Unexpected element after the document root: <{0}>")]
    TrailingElement(String),

    #[error("Invalid number in attribute '{attribute}': {value:?}")]
    InvalidNumber { attribute: String, value: String },
}

/// Birthday text that is not `D.M.Y` or `D.M.Y H:M`.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid birthday {0:?}, expected D.M.Y or D.M.Y H:M")]
pub struct ParseBirthdayError(pub String);

/// Failure while laying out contacts for printing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PrintError {
    #[error("No columns selected")]
    NoColumns,

    #[error("Page of {width}x{height} is too small for {columns} columns")]
    PageTooSmall {
        width: usize,
        height: usize,
        columns: usize,
    },
}

/// Failure while checking for or downloading an update.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing property: {0}")]
    MissingProperty(&'static str),

    #[error("Invalid version key: {0:?}")]
    InvalidVersion(String),

    #[error("Auto-update works only on Windows")]
    UnsupportedPlatform,

    #[error("Could not determine the downloads directory")]
    NoDownloadDir,
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;
