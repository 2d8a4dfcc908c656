use std::fmt;
use std::path::{Path, PathBuf};

use crate::datatype::Element;
use crate::error::Result;
use crate::value::{Dump, Load};
use crate::{series, util, value, Ix};

/// Default chunk size, in elements, for newly created extendable series.
pub const DEFAULT_SERIES_CHUNK: Ix = 10;

/// Opens a [`File`] with non-default options.
///
/// ```no_run
/// # fn main() -> h5easy::Result<()> {
/// let file = h5easy::File::with_options()
///     .mode("a")
///     .autoflush(false)
///     .series_chunk(64)
///     .open("data.h5")?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct FileBuilder {
    mode: String,
    autoflush: bool,
    series_chunk: Ix,
}

impl Default for FileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FileBuilder {
    /// Creates a builder with mode `"a"`, autoflush on and the default
    /// series chunk size.
    pub fn new() -> Self {
        Self { mode: "a".to_string(), autoflush: true, series_chunk: DEFAULT_SERIES_CHUNK }
    }

    /// File access mode, one of `"r"`, `"w"`, `"a"`.
    ///
    /// - `"w"`: create, truncating the file if it exists;
    /// - `"r"`: open an existing file read-only;
    /// - `"a"`: open read-write if the file exists, else create it.
    pub fn mode<S: Into<String>>(&mut self, mode: S) -> &mut Self {
        self.mode = mode.into();
        self
    }

    /// Whether every mutating operation flushes the file before returning
    /// (on by default). When off, durability requires an explicit
    /// [`File::flush`] or a clean drop.
    pub fn autoflush(&mut self, autoflush: bool) -> &mut Self {
        self.autoflush = autoflush;
        self
    }

    /// Chunk size, in elements, for extendable series created through
    /// [`File::write_at`]. Must be at least 1.
    pub fn series_chunk(&mut self, series_chunk: Ix) -> &mut Self {
        self.series_chunk = series_chunk;
        self
    }

    /// Opens the file at `filename` with the configured options.
    pub fn open<P: AsRef<Path>>(&self, filename: P) -> Result<File> {
        let filename = filename.as_ref();
        ensure!(self.series_chunk >= 1, Open, "series chunk size must be at least 1");
        let fid = match self.mode.as_str() {
            "r" => {
                if !filename.exists() {
                    fail!(NotFound, "unable to open file {:?}: no such file", filename);
                }
                hdf5::File::open(filename)
            }
            "w" => hdf5::File::create(filename),
            "a" => hdf5::File::append(filename),
            mode => fail!(Open, "invalid file access mode '{}', expected r|w|a", mode),
        };
        let fid = match fid {
            Ok(fid) => fid,
            Err(err) => fail!(Open, "unable to open file {:?}: {}", filename, err),
        };
        Ok(File {
            fid,
            filename: filename.to_path_buf(),
            read_only: self.mode == "r",
            mode: self.mode.clone(),
            autoflush: self.autoflush,
            series_chunk: self.series_chunk,
        })
    }
}

/// A typed, path-addressed handle to one HDF5 file.
///
/// Paths are slash-delimited; every non-final segment names a group and the
/// final segment names a dataset. Groups are created lazily by every write,
/// so callers never manage them explicitly.
///
/// The handle is exclusive for its whole lifetime: accessing the same file
/// through a second handle, in or across processes, is unsupported and up to
/// the caller to avoid. All operations are synchronous and return their
/// outcome immediately; nothing is retried.
///
/// With autoflush off, writes become durable only at [`flush`](Self::flush)
/// or when the handle is dropped cleanly; writes not flushed before an
/// abnormal termination are lost.
pub struct File {
    fid: hdf5::File,
    filename: PathBuf,
    mode: String,
    read_only: bool,
    autoflush: bool,
    series_chunk: Ix,
}

impl File {
    /// Opens the file at `filename` in the given mode with default options.
    ///
    /// See [`FileBuilder::mode`] for the recognized modes.
    pub fn open<P: AsRef<Path>>(filename: P, mode: &str) -> Result<Self> {
        FileBuilder::new().mode(mode).open(filename)
    }

    /// Starts building a file handle with non-default options.
    pub fn with_options() -> FileBuilder {
        FileBuilder::new()
    }

    /// Path the file was opened at.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Mode string the file was opened with.
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Whether the file was opened read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether mutating operations flush before returning.
    pub fn autoflush(&self) -> bool {
        self.autoflush
    }

    /// Chunk size used when a write creates a new extendable series.
    pub fn series_chunk(&self) -> Ix {
        self.series_chunk
    }

    /// Borrows the underlying engine handle, for operations this crate does
    /// not surface. Mutations made through it bypass autoflush.
    pub fn handle(&self) -> &hdf5::File {
        &self.fid
    }

    /// Flushes all buffered writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.fid.flush()?;
        Ok(())
    }

    /// Flush honoring the autoflush setting; every mutation ends here.
    pub(crate) fn commit(&self) -> Result<()> {
        if self.autoflush {
            self.flush()
        } else {
            Ok(())
        }
    }

    /// Checks that every group along `path` and the final segment itself
    /// exist. Absence at any level is a normal `false`, never an error.
    pub fn exists(&self, path: &str) -> bool {
        util::prefixes(path).iter().all(|prefix| self.fid.link_exists(prefix))
    }

    /// Idempotently creates every group along `path` that does not yet
    /// exist, the final segment included. Never fails on a path whose
    /// groups are already present.
    pub fn create_group(&self, path: &str) -> Result<()> {
        self.create_groups(&util::prefixes(path))?;
        self.commit()
    }

    pub(crate) fn create_groups(&self, prefixes: &[String]) -> Result<()> {
        for prefix in prefixes {
            if !self.fid.link_exists(prefix) {
                self.fid.create_group(prefix)?;
            }
        }
        Ok(())
    }

    /// Creates the groups above the final segment of `path` and returns the
    /// normalized dataset path.
    pub(crate) fn prepare_parent(&self, path: &str) -> Result<String> {
        let mut prefixes = util::prefixes(path);
        let name = match prefixes.pop() {
            Some(name) => name,
            None => fail!(Internal, "empty dataset path: {:?}", path),
        };
        self.create_groups(&prefixes)?;
        Ok(name)
    }

    /// Removes the link at `path` from the file's namespace.
    ///
    /// The engine keeps the file space of unlinked objects allocated;
    /// repack the file externally (`h5repack`) to reclaim it.
    pub fn unlink(&self, path: &str) -> Result<()> {
        let name = match util::normalize(path) {
            Some(name) => name,
            None => fail!(NotFound, "cannot unlink the root group"),
        };
        ensure!(self.exists(&name), NotFound, "no such link: '{}'", name);
        self.fid.unlink(&name)?;
        self.commit()
    }

    /// Opens the dataset at `path`, reporting `NotFound` both when the path
    /// is absent and when it names something that is not a dataset.
    pub(crate) fn dataset(&self, path: &str) -> Result<hdf5::Dataset> {
        let name = match util::normalize(path) {
            Some(name) => name,
            None => fail!(NotFound, "no dataset at the root group"),
        };
        ensure!(self.exists(&name), NotFound, "no object at '{}'", name);
        match self.fid.dataset(&name) {
            Ok(ds) => Ok(ds),
            Err(_) => fail!(NotFound, "object at '{}' is not a dataset", name),
        }
    }

    /// Shape of the dataset at `path`, without reading its data. Scalars
    /// report an empty shape.
    pub fn shape(&self, path: &str) -> Result<Vec<Ix>> {
        Ok(self.dataset(path)?.shape())
    }

    /// Extent of the dataset at `path` along `axis`.
    ///
    /// Fails with `OutOfRange` whenever `axis >= rank`, for any magnitude
    /// of `axis`.
    pub fn shape_along(&self, path: &str, axis: Ix) -> Result<Ix> {
        let shape = self.shape(path)?;
        ensure!(
            axis < shape.len(),
            OutOfRange,
            "axis {} out of bounds for rank {} at '{}'",
            axis,
            shape.len(),
            path
        );
        Ok(shape[axis])
    }

    /// Total number of elements of the dataset at `path` (1 for scalars).
    pub fn size(&self, path: &str) -> Result<Ix> {
        Ok(self.shape(path)?.iter().product())
    }

    /// Writes `value` to the dataset at `path`, creating missing groups
    /// first and flushing afterwards if autoflush is on.
    ///
    /// Accepted values: `usize`/`f32`/`f64` scalars, `&str`/`String`,
    /// slices and `Vec`s of the numeric types, any `ndarray` array or view,
    /// and (with the `nalgebra` feature) `DMatrix`/`DVector`. Shapes and
    /// element types are inferred from the value; all buffers are stored
    /// row-major.
    ///
    /// An existing dataset at `path` is updated in place when its shape and
    /// element type match the value exactly; otherwise the write fails with
    /// `AlreadyExists` and the stored data is untouched.
    pub fn write<V: Dump + ?Sized>(&self, path: &str, value: &V) -> Result<()> {
        value.dump(self, path)
    }

    /// Writes a flat slice as a dataset of the given shape.
    ///
    /// Fails with `ShapeMismatch` if the product of `shape` differs from
    /// `data.len()`. An empty shape stores a single element as a scalar.
    pub fn write_shaped<T: Element>(&self, path: &str, data: &[T], shape: &[Ix]) -> Result<()> {
        value::dump_slice(self, path, data, shape)
    }

    /// Writes one scalar at position `index` of the extendable series at
    /// `path`.
    ///
    /// A missing `path` is created as a rank-1 dataset with extent
    /// `index + 1`, an unlimited upper bound and the configured
    /// [series chunk size](FileBuilder::series_chunk); this is the only
    /// write that creates an open-ended dataset. An existing `path` must be
    /// such a series: fixed-shape datasets fail with `TypeMismatch`,
    /// non-rank-1 datasets with `ShapeMismatch`. The extent grows to
    /// `index + 1` when `index` lies beyond it; skipped positions read back
    /// as an unspecified value until written.
    pub fn write_at<T: Element>(&self, path: &str, value: T, index: Ix) -> Result<()> {
        series::write_at(self, path, value, index)
    }

    /// Reads the value at `path` into the requested type.
    ///
    /// The stored element family and byte width must match the target type
    /// (`TypeMismatch` / `PrecisionMismatch`); fixed-rank targets require
    /// the stored rank to match (`RankMismatch`); scalar targets require a
    /// single stored element. `Vec<T>` accepts any rank and yields the
    /// row-major buffer.
    pub fn read<V: Load>(&self, path: &str) -> Result<V> {
        V::load(self, path)
    }

    /// Reads one element of a rank-1 dataset.
    ///
    /// Fails with `RankMismatch` if the dataset is not rank-1 and with
    /// `OutOfRange` if `index` lies beyond the current extent.
    pub fn read_at<T: Element>(&self, path: &str, index: Ix) -> Result<T> {
        series::read_at(self, path, index)
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<h5easy file {:?}, mode '{}'>", self.filename, self.mode)
    }
}
