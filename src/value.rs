use std::str::FromStr;

use hdf5::types::{TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::H5Type;

use crate::datatype::{ensure_kind, type_name, Element, ElementKind};
use crate::error::Result;
use crate::file::File;
use crate::Ix;

/// Values that [`File::write`] accepts.
///
/// Implemented for the numeric scalars (`usize`, `f32`, `f64`), for
/// `&str`/`String`, for slices and `Vec`s of the numeric types, for any
/// `ndarray` array or view of them, and for `nalgebra` dynamic matrices and
/// vectors behind the `nalgebra` feature.
pub trait Dump {
    /// Writes `self` to the dataset at `path`, creating missing groups.
    fn dump(&self, file: &File, path: &str) -> Result<()>;
}

/// Values that [`File::read`] produces.
///
/// Implemented for the numeric scalars, `String`, `Vec<T>` (any stored
/// rank, flattened row-major), `ndarray` owned arrays (`Array1`/`Array2`
/// rank-checked, `ArrayD` any rank) and `nalgebra` dynamic matrices and
/// vectors behind the `nalgebra` feature.
pub trait Load: Sized {
    /// Reads a value of this type from the dataset at `path`.
    fn load(file: &File, path: &str) -> Result<Self>;
}

/// Opens `path` for a typed read: the stored element type must satisfy
/// `kind`, and the stored rank must equal `rank` when one is required.
/// This is the single validation path behind every numeric `Load` impl.
pub(crate) fn open_checked(
    file: &File,
    path: &str,
    kind: ElementKind,
    rank: Option<usize>,
) -> Result<hdf5::Dataset> {
    let ds = file.dataset(path)?;
    ensure_kind(path, &ds.dtype()?.to_descriptor()?, kind)?;
    if let Some(rank) = rank {
        let ndim = ds.shape().len();
        ensure!(
            ndim == rank,
            RankMismatch,
            "dataset '{}' has rank {}, expected {}",
            path,
            ndim,
            rank
        );
    }
    Ok(ds)
}

/// Creates the dataset for a fixed-shape write, after creating the parent
/// groups. An existing dataset is reused for an in-place update when its
/// shape and element type match exactly; any other existing object fails
/// with `AlreadyExists` and is left untouched.
pub(crate) fn create_checked<T: H5Type>(
    file: &File,
    path: &str,
    kind: ElementKind,
    shape: &[Ix],
) -> Result<hdf5::Dataset> {
    let name = file.prepare_parent(path)?;
    if file.handle().link_exists(&name) {
        let ds = match file.handle().dataset(&name) {
            Ok(ds) => ds,
            Err(_) => fail!(AlreadyExists, "object at '{}' exists and is not a dataset", name),
        };
        if ensure_kind(&name, &ds.dtype()?.to_descriptor()?, kind).is_err() {
            fail!(AlreadyExists, "dataset '{}' exists with a different element type", name);
        }
        let stored = ds.shape();
        ensure!(
            stored == shape,
            AlreadyExists,
            "dataset '{}' exists with shape {:?}, refusing to overwrite with {:?}",
            name,
            stored,
            shape
        );
        return Ok(ds);
    }
    let builder = file.handle().new_dataset::<T>();
    let ds = if shape.is_empty() {
        builder.create(name.as_str())?
    } else {
        builder.shape(shape.to_vec()).create(name.as_str())?
    };
    Ok(ds)
}

/// Shared fixed-shape write path for flat buffers.
pub(crate) fn dump_slice<T: Element>(
    file: &File,
    path: &str,
    data: &[T],
    shape: &[Ix],
) -> Result<()> {
    let n: Ix = shape.iter().product();
    ensure!(
        n == data.len(),
        ShapeMismatch,
        "shape {:?} holds {} elements, data has {}",
        shape,
        n,
        data.len()
    );
    let ds = create_checked::<T>(file, path, T::KIND, shape)?;
    ds.write_raw(data)?;
    file.commit()
}

// Scalars get concrete impls rather than a blanket over `Element`; a blanket
// `impl<T: Element> Dump for T` would collide with the container impls under
// the coherence rules.
macro_rules! impl_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        impl Dump for $ty {
            fn dump(&self, file: &File, path: &str) -> Result<()> {
                let ds = create_checked::<$ty>(file, path, <$ty>::KIND, &[])?;
                ds.write_scalar(self)?;
                file.commit()
            }
        }

        impl Load for $ty {
            fn load(file: &File, path: &str) -> Result<Self> {
                let ds = open_checked(file, path, <$ty>::KIND, None)?;
                let n: Ix = ds.shape().iter().product();
                ensure!(
                    n == 1,
                    RankMismatch,
                    "dataset '{}' holds {} elements, expected a scalar",
                    path,
                    n
                );
                match ds.read_raw::<$ty>()?.first() {
                    Some(&value) => Ok(value),
                    None => fail!(Internal, "engine returned an empty buffer for '{}'", path),
                }
            }
        }
    )+};
}

impl_scalar!(usize, f32, f64);

impl<T: Element> Dump for [T] {
    fn dump(&self, file: &File, path: &str) -> Result<()> {
        dump_slice(file, path, self, &[self.len()])
    }
}

impl<T: Element> Dump for Vec<T> {
    fn dump(&self, file: &File, path: &str) -> Result<()> {
        dump_slice(file, path, self, &[self.len()])
    }
}

impl Dump for str {
    fn dump(&self, file: &File, path: &str) -> Result<()> {
        let value = match VarLenUnicode::from_str(self) {
            Ok(value) => value,
            Err(err) => fail!(Internal, "cannot store string at '{}': {}", path, err),
        };
        let ds = create_checked::<VarLenUnicode>(file, path, ElementKind::Str, &[])?;
        ds.write_scalar(&value)?;
        file.commit()
    }
}

impl Dump for String {
    fn dump(&self, file: &File, path: &str) -> Result<()> {
        self.as_str().dump(file, path)
    }
}

impl<T: Element> Load for Vec<T> {
    fn load(file: &File, path: &str) -> Result<Self> {
        let ds = open_checked(file, path, T::KIND, None)?;
        Ok(ds.read_raw::<T>()?)
    }
}

impl Load for String {
    fn load(file: &File, path: &str) -> Result<Self> {
        let ds = file.dataset(path)?;
        match ds.dtype()?.to_descriptor()? {
            TypeDescriptor::VarLenUnicode => read_scalar_str::<VarLenUnicode>(&ds, path),
            TypeDescriptor::VarLenAscii => read_scalar_str::<VarLenAscii>(&ds, path),
            other => fail!(
                TypeMismatch,
                "dataset '{}' holds {}, expected a string",
                path,
                type_name(&other)
            ),
        }
    }
}

fn read_scalar_str<T>(ds: &hdf5::Dataset, path: &str) -> Result<String>
where
    T: H5Type + std::ops::Deref<Target = str>,
{
    let values = ds.read_raw::<T>()?;
    let n = values.len();
    match values.into_iter().next() {
        Some(value) if n == 1 => Ok((*value).to_owned()),
        _ => fail!(RankMismatch, "dataset '{}' holds {} strings, expected a single scalar", path, n),
    }
}
