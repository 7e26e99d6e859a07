//! Python bindings for window selection

use pyo3::prelude::*;

use crate::spectrum::{WindowShape, WindowSpec};

/// Window shape enum exposed to Python
#[pyclass(name = "WindowShape")]
#[derive(Clone, Copy)]
pub enum PyWindowShape {
    Rectangular,
    Hann,
    Hamming,
}

impl From<PyWindowShape> for WindowShape {
    fn from(py_shape: PyWindowShape) -> Self {
        match py_shape {
            PyWindowShape::Rectangular => WindowShape::Rectangular,
            PyWindowShape::Hann => WindowShape::hann(),
            PyWindowShape::Hamming => WindowShape::hamming(),
        }
    }
}

/// Time interval and apodization exposed to Python
#[pyclass(name = "WindowSpec")]
#[derive(Clone)]
pub struct PyWindowSpec {
    pub(crate) spec: WindowSpec,
}

#[pymethods]
impl PyWindowSpec {
    /// Create a window specification
    ///
    /// Args:
    ///     start_time: Interval start in seconds
    ///     end_time: Interval end in seconds
    ///     shape: Window shape (ignored when a0 is given)
    ///     a0: Custom raised-cosine coefficient in [0, 1]
    #[new]
    #[pyo3(signature = (start_time, end_time, shape=PyWindowShape::Rectangular, a0=None))]
    fn new(start_time: f64, end_time: f64, shape: PyWindowShape, a0: Option<f64>) -> PyResult<Self> {
        let shape = match a0 {
            Some(a0) => WindowShape::RaisedCosine(a0),
            None => shape.into(),
        };
        shape.validate()?;

        Ok(Self {
            spec: WindowSpec::new(start_time, end_time, shape),
        })
    }

    #[getter]
    fn start_time(&self) -> f64 {
        self.spec.start_time
    }

    #[getter]
    fn end_time(&self) -> f64 {
        self.spec.end_time
    }

    /// Raised-cosine a0, or None for a rectangular window
    #[getter]
    fn a0(&self) -> Option<f64> {
        match self.spec.shape {
            WindowShape::Rectangular => None,
            WindowShape::RaisedCosine(a0) => Some(a0),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "WindowSpec(start_time={}, end_time={}, shape={:?})",
            self.spec.start_time, self.spec.end_time, self.spec.shape
        )
    }
}
