//! Time-domain analysis: per-frame features, frame series and reducers

pub mod features;
pub mod series;
pub mod reducers;

pub use features::FrameFeature;
pub use series::{FrameConfig, FrameSeries};
pub use reducers::ScalarReducer;
