//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::AnalysisError;

mod session_bindings;
mod window_bindings;

impl From<AnalysisError> for PyErr {
    fn from(err: AnalysisError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn waveform_inspector(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<session_bindings::PyAnalysisSession>()?;

    // Window description
    m.add_class::<window_bindings::PyWindowShape>()?;
    m.add_class::<window_bindings::PyWindowSpec>()?;

    m.add("NOT_COMPUTABLE", crate::error::NOT_COMPUTABLE)?;

    Ok(())
}
