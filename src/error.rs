use std::error::Error as StdError;
use std::fmt;
use std::result;

/// The error type for all fallible operations on a [`File`](crate::File).
///
/// Every variant except [`Hdf5`](Error::Hdf5) is raised by this crate's own
/// validation; `Hdf5` wraps whatever the underlying library reports for
/// failures outside that validation (I/O errors, malformed files and so on).
#[derive(Debug)]
pub enum Error {
    /// Unrecognized open mode, or the engine failed to open the file.
    Open(String),
    /// A file, group or dataset was absent where presence is required.
    NotFound(String),
    /// Refused to overwrite an existing dataset whose shape or element type
    /// differs from the value being written.
    AlreadyExists(String),
    /// The stored element family (integer, float, string) differs from the
    /// requested one, or a fixed-shape dataset was addressed as an
    /// extendable series.
    TypeMismatch(String),
    /// The stored element width differs from the requested one within the
    /// same family.
    PrecisionMismatch(String),
    /// The stored rank differs from a fixed-rank target, or a multi-element
    /// dataset was read as a scalar.
    RankMismatch(String),
    /// An explicit shape does not match the supplied data length, or a
    /// series dataset is not one-dimensional.
    ShapeMismatch(String),
    /// An axis or element index is out of bounds.
    OutOfRange(String),
    /// An error reported by the underlying HDF5 library.
    Hdf5(hdf5::Error),
    /// A value that cannot be represented in the container.
    Internal(String),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Open(msg) => write!(f, "open error: {}", msg),
            Self::NotFound(msg) => write!(f, "not found: {}", msg),
            Self::AlreadyExists(msg) => write!(f, "already exists: {}", msg),
            Self::TypeMismatch(msg) => write!(f, "type mismatch: {}", msg),
            Self::PrecisionMismatch(msg) => write!(f, "precision mismatch: {}", msg),
            Self::RankMismatch(msg) => write!(f, "rank mismatch: {}", msg),
            Self::ShapeMismatch(msg) => write!(f, "shape mismatch: {}", msg),
            Self::OutOfRange(msg) => write!(f, "out of range: {}", msg),
            Self::Hdf5(err) => write!(f, "hdf5: {}", err),
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Hdf5(err) => Some(err),
            _ => None,
        }
    }
}

impl From<hdf5::Error> for Error {
    fn from(err: hdf5::Error) -> Self {
        Self::Hdf5(err)
    }
}
