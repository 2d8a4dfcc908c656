//! Extendable one-dimensional series: point writes at arbitrary indices into
//! a dataset whose extent grows on demand.
//!
//! A series is created by the first [`File::write_at`] on a missing path, as
//! a rank-1 dataset with an unlimited upper bound and the chunk size the file
//! was built with. Every later `write_at` must find that same kind of
//! dataset; fixed-shape datasets are rejected rather than resized.

use ndarray::{s, ArrayView1};

use crate::datatype::{ensure_kind, Element};
use crate::error::Result;
use crate::file::File;
use crate::Ix;

/// Opens the series at `name` (a normalized dataset path) and validates it:
/// extendable, rank-1, element type matching `kind`.
fn open_series<T: Element>(file: &File, name: &str) -> Result<hdf5::Dataset> {
    let ds = match file.handle().dataset(name) {
        Ok(ds) => ds,
        Err(_) => fail!(NotFound, "object at '{}' is not a dataset", name),
    };
    ensure!(
        ds.is_resizable(),
        TypeMismatch,
        "dataset '{}' has a fixed shape, expected an extendable series",
        name
    );
    let rank = ds.shape().len();
    ensure!(
        rank == 1,
        ShapeMismatch,
        "dataset '{}' has rank {}, a series must be one-dimensional",
        name,
        rank
    );
    ensure_kind(name, &ds.dtype()?.to_descriptor()?, T::KIND)?;
    Ok(ds)
}

/// Backend of [`File::write_at`]: create-or-grow, then a point write.
pub(crate) fn write_at<T: Element>(file: &File, path: &str, value: T, index: Ix) -> Result<()> {
    let name = file.prepare_parent(path)?;
    let ds = if file.handle().link_exists(&name) {
        let ds = open_series::<T>(file, &name)?;
        if index >= ds.shape()[0] {
            ds.resize((index + 1,))?;
        }
        ds
    } else {
        file.handle()
            .new_dataset::<T>()
            .shape(((index + 1)..,))
            .chunk((file.series_chunk(),))
            .create(name.as_str())?
    };
    let value = [value];
    ds.write_slice(ArrayView1::from(&value[..]), s![index..index + 1])?;
    file.commit()
}

/// Backend of [`File::read_at`]: one element of a rank-1 dataset.
pub(crate) fn read_at<T: Element>(file: &File, path: &str, index: Ix) -> Result<T> {
    let ds = file.dataset(path)?;
    let shape = ds.shape();
    ensure!(
        shape.len() == 1,
        RankMismatch,
        "dataset '{}' has rank {}, expected rank 1",
        path,
        shape.len()
    );
    ensure!(
        index < shape[0],
        OutOfRange,
        "index {} out of bounds for extent {} at '{}'",
        index,
        shape[0],
        path
    );
    ensure_kind(path, &ds.dtype()?.to_descriptor()?, T::KIND)?;
    let out = ds.read_slice_1d::<T, _>(s![index..index + 1])?;
    match out.first() {
        Some(&value) => Ok(value),
        None => fail!(Internal, "engine returned an empty selection for '{}'", path),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::test::with_tmp_file;
    use crate::File;

    #[test]
    fn test_append_growth() {
        with_tmp_file(|file| {
            file.write_at("/series", 0.1f64, 0).unwrap();
            file.write_at("/series", 4.1f64, 1).unwrap();
            assert_eq!(file.shape("/series").unwrap(), vec![2]);
            assert_eq!(file.read::<Vec<f64>>("/series").unwrap(), vec![0.1, 4.1]);
            file.write_at("/series", 9.0f64, 9).unwrap();
            assert_eq!(file.shape("/series").unwrap(), vec![10]);
            assert_eq!(file.read_at::<f64>("/series", 9).unwrap(), 9.0);
        });
    }

    #[test]
    fn test_first_write_at_large_index() {
        with_tmp_file(|file| {
            file.write_at("/g/series", 7usize, 4).unwrap();
            assert_eq!(file.shape("/g/series").unwrap(), vec![5]);
            assert_eq!(file.read_at::<usize>("/g/series", 4).unwrap(), 7);
        });
    }

    #[test]
    fn test_overwrite_within_extent() {
        with_tmp_file(|file| {
            file.write_at("/s", 1.0f64, 0).unwrap();
            file.write_at("/s", 2.0f64, 1).unwrap();
            file.write_at("/s", 3.0f64, 0).unwrap();
            assert_eq!(file.read::<Vec<f64>>("/s").unwrap(), vec![3.0, 2.0]);
        });
    }

    #[test]
    fn test_fixed_dataset_rejected() {
        with_tmp_file(|file| {
            file.write("/fixed", &vec![1.0f64, 2.0]).unwrap();
            assert_err!(
                file.write_at("/fixed", 3.0f64, 2),
                "has a fixed shape, expected an extendable series"
            );
            assert_eq!(file.read::<Vec<f64>>("/fixed").unwrap(), vec![1.0, 2.0]);
        });
    }

    #[test]
    fn test_series_element_type_guards() {
        with_tmp_file(|file| {
            file.write_at("/s", 1.0f64, 0).unwrap();
            assert!(matches!(file.write_at("/s", 1usize, 1), Err(Error::TypeMismatch(_))));
            assert!(matches!(file.write_at("/s", 1.0f32, 1), Err(Error::PrecisionMismatch(_))));
            assert_eq!(file.shape("/s").unwrap(), vec![1]);
        });
    }

    #[test]
    fn test_series_chunk_from_builder() {
        crate::test::with_tmp_path(|path| {
            let file = File::with_options().mode("w").series_chunk(3).open(&path).unwrap();
            file.write_at("/s", 1.0f64, 0).unwrap();
            let ds = file.handle().dataset("s").unwrap();
            assert_eq!(ds.chunk(), Some(vec![3]));
        });
    }

    #[test]
    fn test_read_at_bounds_and_rank() {
        with_tmp_file(|file| {
            file.write_at("/s", 1.0f64, 0).unwrap();
            assert!(matches!(file.read_at::<f64>("/s", 1), Err(Error::OutOfRange(_))));
            assert!(matches!(file.read_at::<f64>("/missing", 0), Err(Error::NotFound(_))));
            file.write("/scalar", &1.0f64).unwrap();
            assert!(matches!(file.read_at::<f64>("/scalar", 0), Err(Error::RankMismatch(_))));
            file.write_shaped("/m", &[0.0f64; 4], &[2, 2]).unwrap();
            assert!(matches!(file.read_at::<f64>("/m", 0), Err(Error::RankMismatch(_))));
        });
    }

    #[test]
    fn test_read_at_works_on_fixed_rank_1() {
        with_tmp_file(|file| {
            file.write("/v", &vec![10usize, 11, 12]).unwrap();
            assert_eq!(file.read_at::<usize>("/v", 2).unwrap(), 12);
        });
    }

    #[test]
    fn test_sparse_write_reads_back_written_values() {
        with_tmp_file(|file| {
            file.write_at("/s", 5.0f64, 5).unwrap();
            assert_eq!(file.shape("/s").unwrap(), vec![6]);
            assert_eq!(file.read_at::<f64>("/s", 5).unwrap(), 5.0);
            // Values below index 5 were never written and are unspecified.
        });
    }
}
