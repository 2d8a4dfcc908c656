//! `nalgebra` backend, behind the `nalgebra` feature: dynamically sized
//! matrices and vectors of the supported element types.
//!
//! `nalgebra` stores matrices column-major while datasets are row-major, so
//! every matrix write transposes into a scratch buffer and every matrix read
//! rebuilds from the row-major buffer. Always a copy, never an alias.

use nalgebra::{DMatrix, DVector, Scalar};

use crate::datatype::Element;
use crate::error::Result;
use crate::file::File;
use crate::value::{create_checked, open_checked, Dump, Load};

impl<T: Element + Scalar> Dump for DMatrix<T> {
    fn dump(&self, file: &File, path: &str) -> Result<()> {
        let shape = [self.nrows(), self.ncols()];
        let ds = create_checked::<T>(file, path, T::KIND, &shape)?;
        // The transpose's column-major storage is this matrix row-major.
        let row_major = self.transpose();
        ds.write_raw(row_major.as_slice())?;
        file.commit()
    }
}

impl<T: Element + Scalar> Dump for DVector<T> {
    fn dump(&self, file: &File, path: &str) -> Result<()> {
        let ds = create_checked::<T>(file, path, T::KIND, &[self.len()])?;
        ds.write_raw(self.as_slice())?;
        file.commit()
    }
}

impl<T: Element + Scalar> Load for DMatrix<T> {
    fn load(file: &File, path: &str) -> Result<Self> {
        let ds = open_checked(file, path, T::KIND, Some(2))?;
        let shape = ds.shape();
        let buf = ds.read_raw::<T>()?;
        Ok(Self::from_row_slice(shape[0], shape[1], &buf))
    }
}

impl<T: Element + Scalar> Load for DVector<T> {
    fn load(file: &File, path: &str) -> Result<Self> {
        let ds = open_checked(file, path, T::KIND, Some(1))?;
        Ok(Self::from_vec(ds.read_raw::<T>()?))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{DMatrix, DVector};

    use crate::error::Error;
    use crate::test::with_tmp_file;

    #[test]
    fn test_matrix_roundtrip() {
        with_tmp_file(|file| {
            let m = DMatrix::from_row_slice(2, 2, &[0usize, 1, 2, 3]);
            file.write("/mat", &m).unwrap();
            assert_eq!(file.shape("/mat").unwrap(), vec![2, 2]);
            assert_eq!(file.read::<DMatrix<usize>>("/mat").unwrap(), m);
        });
    }

    #[test]
    fn test_matrix_is_stored_row_major() {
        with_tmp_file(|file| {
            // Column-major construction; on disk the rows must be contiguous.
            let m = DMatrix::from_column_slice(2, 3, &[1.0f64, 4.0, 2.0, 5.0, 3.0, 6.0]);
            assert_eq!(m[(0, 1)], 2.0);
            file.write("/m", &m).unwrap();
            assert_eq!(file.shape("/m").unwrap(), vec![2, 3]);
            assert_eq!(file.read::<Vec<f64>>("/m").unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
            assert_eq!(file.read::<DMatrix<f64>>("/m").unwrap(), m);
        });
    }

    #[test]
    fn test_vector_roundtrip() {
        with_tmp_file(|file| {
            let v = DVector::from_vec(vec![0.5f32, 1.5, 2.5]);
            file.write("/v", &v).unwrap();
            assert_eq!(file.shape("/v").unwrap(), vec![3]);
            assert_eq!(file.read::<DVector<f32>>("/v").unwrap(), v);
        });
    }

    #[test]
    fn test_rank_guards() {
        with_tmp_file(|file| {
            file.write("/v", &DVector::from_vec(vec![1.0f64, 2.0])).unwrap();
            assert!(matches!(file.read::<DMatrix<f64>>("/v"), Err(Error::RankMismatch(_))));
            file.write("/m", &DMatrix::from_row_slice(2, 2, &[1.0f64, 2.0, 3.0, 4.0])).unwrap();
            assert!(matches!(file.read::<DVector<f64>>("/m"), Err(Error::RankMismatch(_))));
        });
    }

    #[test]
    fn test_ndarray_cross_read() {
        with_tmp_file(|file| {
            let m = DMatrix::from_row_slice(2, 3, &[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
            file.write("/m", &m).unwrap();
            let nd = file.read::<ndarray::Array2<f64>>("/m").unwrap();
            assert_eq!(nd, ndarray::arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
            file.write("/nd", &nd).unwrap();
            assert_eq!(file.read::<DMatrix<f64>>("/nd").unwrap(), m);
        });
    }
}
