//! `ndarray` backend: writes any array or view of the supported element
//! types, reads back into owned arrays with the rank checked up front.
//!
//! Datasets are stored row-major. Views in a non-standard layout (transposed,
//! reversed axes, strided slices) are copied into a standard-layout buffer
//! before writing; nothing is ever written through an aliased view.

use ndarray::{Array1, Array2, ArrayBase, ArrayD, Data, Dimension};

use crate::datatype::Element;
use crate::error::Result;
use crate::file::File;
use crate::value::{create_checked, open_checked, Dump, Load};

impl<T, S, D> Dump for ArrayBase<S, D>
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    fn dump(&self, file: &File, path: &str) -> Result<()> {
        let shape = self.shape().to_vec();
        let ds = create_checked::<T>(file, path, T::KIND, &shape)?;
        match self.as_slice() {
            Some(data) => ds.write_raw(data)?,
            None => {
                // Logical (row-major) order, whatever the view's strides.
                let data: Vec<T> = self.iter().copied().collect();
                ds.write_raw(&data)?;
            }
        }
        file.commit()
    }
}

impl<T: Element> Load for Array1<T> {
    fn load(file: &File, path: &str) -> Result<Self> {
        let ds = open_checked(file, path, T::KIND, Some(1))?;
        Ok(ds.read_1d()?)
    }
}

impl<T: Element> Load for Array2<T> {
    fn load(file: &File, path: &str) -> Result<Self> {
        let ds = open_checked(file, path, T::KIND, Some(2))?;
        Ok(ds.read_2d()?)
    }
}

impl<T: Element> Load for ArrayD<T> {
    fn load(file: &File, path: &str) -> Result<Self> {
        let ds = open_checked(file, path, T::KIND, None)?;
        Ok(ds.read_dyn()?)
    }
}
