//! The `h5easy` prelude module.
//!
//! Reexports the handle and the traits its generic methods are bounded by,
//! for glob-importing all at once:
//!
//! ```
//! use h5easy::prelude::*;
//! ```

pub use crate::{Dump, Element, ElementKind, Load};
pub use crate::{Error, File, FileBuilder, Ix, Result};
