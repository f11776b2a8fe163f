//! Errors specific to reading a PE image, decoding its resources and writing them out.

use alloc::string::String;

#[cfg(feature = "std")]
use std::io::Error as IOError;

/// Error that can occur when reading and parsing bytes.
/// Holds the name of the type that could not be read and the offset it was read at.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[cfg_attr(feature = "std", error("{0} at offset {1:#x}"))]
pub struct ReadError(pub String, pub usize);

/// Errors that can occur when reading a PE image.
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ImageReadError {
    #[cfg_attr(feature = "std", error("invalid bytes: {0}"))]
    InvalidBytes(ReadError),
    #[cfg_attr(feature = "std", error("invalid header: {0}"))]
    InvalidHeader(String),
    #[cfg_attr(feature = "std", error("missing section: {0}"))]
    MissingSection(String),
    #[cfg_attr(feature = "std", error("invalid section: {0}"))]
    InvalidSection(String),
    #[cfg_attr(feature = "std", error("invalid resources: {0}"))]
    InvalidResources(ResourceError),
    #[cfg(feature = "std")]
    #[error("io error: {0}")]
    IOError(IOError),
}
impl From<ReadError> for ImageReadError {
    fn from(error: ReadError) -> Self { ImageReadError::InvalidBytes(error) }
}
impl From<ResourceError> for ImageReadError {
    fn from(error: ResourceError) -> Self { ImageReadError::InvalidResources(error) }
}
#[cfg(feature = "std")]
impl From<IOError> for ImageReadError {
    fn from(error: IOError) -> Self { ImageReadError::IOError(error) }
}

/// Errors that can occur when decoding a resource directory.
/// None of them are recoverable, decoding stops at the first one.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ResourceError {
    /// The section is too short for a field the directory tree points at.
    #[cfg_attr(feature = "std", error("truncated data: {0}"))]
    TruncatedData(ReadError),
    /// A data entry points outside the section.
    /// Holds the de-virtualized data offset, the data size and the section size.
    #[cfg_attr(
        feature = "std",
        error("resource data at offset {0} with size {1} outside section of size {2}")
    )]
    OutOfBounds(i64, u32, usize),
    /// The directory tree is nested too deeply, cyclic, or references too many entries.
    #[cfg_attr(feature = "std", error("malformed tree: {0}"))]
    MalformedTree(String),
}
impl From<ReadError> for ResourceError {
    fn from(error: ReadError) -> Self { ResourceError::TruncatedData(error) }
}

/// Errors that can occur when writing resources.
#[cfg(feature = "std")]
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("resource '{0}' not found")]
    NotFound(String),
    #[error("unsafe resource path: {0}")]
    UnsafePath(String),
    #[error("io error: {0}")]
    IOError(IOError),
}
#[cfg(feature = "std")]
impl From<IOError> for ExtractError {
    fn from(error: IOError) -> Self { ExtractError::IOError(error) }
}
