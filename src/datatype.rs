use std::fmt;
use std::mem;

use hdf5::types::TypeDescriptor;
use hdf5::H5Type;

use crate::error::Result;

/// The closed set of element kinds the store moves through datasets.
///
/// Restricting the surface to these kinds is what lets reads validate the
/// stored type up front instead of letting the engine convert silently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Unsigned integer of native word width (`usize`).
    Unsigned,
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit IEEE float.
    Float64,
    /// Variable-length UTF-8 string.
    Str,
}

impl ElementKind {
    /// Byte width of one stored element; `None` for variable-length kinds.
    pub fn width(self) -> Option<usize> {
        match self {
            Self::Unsigned => Some(mem::size_of::<usize>()),
            Self::Float32 => Some(4),
            Self::Float64 => Some(8),
            Self::Str => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unsigned => write!(f, "native unsigned integer"),
            Self::Float32 => write!(f, "32-bit float"),
            Self::Float64 => write!(f, "64-bit float"),
            Self::Str => write!(f, "string"),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for usize {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Numeric element types the store can write and read.
///
/// Sealed; implemented for exactly `usize`, `f32` and `f64`. Strings travel
/// separately as `&str`/`String` values.
pub trait Element: H5Type + Copy + sealed::Sealed {
    /// The tagged kind this type maps to.
    const KIND: ElementKind;
}

impl Element for usize {
    const KIND: ElementKind = ElementKind::Unsigned;
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::Float32;
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::Float64;
}

/// Short human name of a stored datatype, for error messages.
pub(crate) fn type_name(desc: &TypeDescriptor) -> &'static str {
    match desc {
        TypeDescriptor::Integer(_) => "signed integer",
        TypeDescriptor::Unsigned(_) => "unsigned integer",
        TypeDescriptor::Float(_) => "float",
        TypeDescriptor::Boolean => "boolean",
        TypeDescriptor::FixedAscii(_) | TypeDescriptor::FixedUnicode(_) => "fixed-length string",
        TypeDescriptor::VarLenAscii | TypeDescriptor::VarLenUnicode => "string",
        _ => "compound or array",
    }
}

/// Validates a stored datatype against the requested element kind.
///
/// The family is checked first (`TypeMismatch`), then the exact byte width
/// within the family (`PrecisionMismatch`). Signed integers of the right
/// width pass the `Unsigned` check so that files written by other tools
/// remain readable; the engine classifies both as the integer family.
pub(crate) fn ensure_kind(path: &str, stored: &TypeDescriptor, wanted: ElementKind) -> Result<()> {
    if wanted == ElementKind::Str {
        match stored {
            TypeDescriptor::VarLenUnicode | TypeDescriptor::VarLenAscii => return Ok(()),
            other => fail!(
                TypeMismatch,
                "dataset '{}' holds {}, expected a string",
                path,
                type_name(other)
            ),
        }
    }
    let width = match (wanted, stored) {
        (ElementKind::Unsigned, TypeDescriptor::Integer(size))
        | (ElementKind::Unsigned, TypeDescriptor::Unsigned(size)) => *size as usize,
        (ElementKind::Float32, TypeDescriptor::Float(size))
        | (ElementKind::Float64, TypeDescriptor::Float(size)) => *size as usize,
        (_, other) => fail!(
            TypeMismatch,
            "dataset '{}' holds {}, expected {}",
            path,
            type_name(other),
            wanted
        ),
    };
    match wanted.width() {
        Some(expected) => {
            ensure!(
                width == expected,
                PrecisionMismatch,
                "dataset '{}' holds {}-byte elements, requested {}-byte {}",
                path,
                width,
                expected,
                wanted
            );
            Ok(())
        }
        None => Ok(()),
    }
}
