//! Loaded audio and the analysis session built around it

pub mod buffer;
pub mod session;

pub use buffer::SampleBuffer;
pub use session::{AnalysisSession, ScalarValue, DEFAULT_SCALAR_PLAN};
