use pyo3::prelude::*;
use pyo3::types::{PyModule, PyModuleMethods};
use pyo3::{Bound, PyResult, Python};

mod hshg;

use crate::hshg::HshgWrapper;

#[pymodule]
fn pyhshg(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<HshgWrapper>()?;
    Ok(())
}
