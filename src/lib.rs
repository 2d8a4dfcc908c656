//! Typed, path-addressed convenience layer over HDF5.
//!
//! `h5easy` exposes one handle type, [`File`], that writes and reads whole
//! values (scalars, strings, flat slices, `ndarray` arrays and, optionally,
//! `nalgebra` matrices) at slash-delimited paths in an HDF5 file:
//!
//! ```no_run
//! use ndarray::arr2;
//!
//! fn main() -> h5easy::Result<()> {
//!     let file = h5easy::File::open("data.h5", "w")?;
//!     file.write("/path/to/mat", &arr2(&[[0.0f64, 1.0], [2.0, 3.0]]))?;
//!     let mat: ndarray::Array2<f64> = file.read("/path/to/mat")?;
//!     assert_eq!(mat.shape(), &[2, 2]);
//!     Ok(())
//! }
//! ```
//!
//! Groups along a path are created lazily on every write; readers validate
//! the stored element type and rank before any data moves, so a mismatched
//! request fails with a typed [`Error`] instead of a silent conversion. A
//! scalar can also be appended at an arbitrary index of an extendable 1-D
//! series via [`File::write_at`].
//!
//! All I/O is synchronous and unbuffered above the HDF5 library itself; see
//! [`File`] for the durability and exclusive-access caveats.

#[macro_use]
mod macros;

mod array;
mod datatype;
mod error;
mod file;
#[cfg(feature = "nalgebra")]
mod matrix;
mod series;
mod util;
mod value;

pub mod prelude;


pub use crate::datatype::{Element, ElementKind};
pub use crate::error::{Error, Result};
pub use crate::file::{File, FileBuilder, DEFAULT_SERIES_CHUNK};
pub use crate::value::{Dump, Load};

/// Type of a dimension size or index (matches `hdf5::Ix`).
pub type Ix = usize;
