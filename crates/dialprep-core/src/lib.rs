pub mod domain;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod rules;

pub use domain::*;
pub use error::{CoreError, Rejection};
pub use output::{OutputField, OutputRecord};
pub use pipeline::{process, Batch, BatchStats, PipelineOptions};
pub use rules::*;
