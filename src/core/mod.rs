pub mod etl;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{FlowEdge, FlowTable, LabeledMatrix};
pub use crate::domain::ports::{ConfigProvider, MatrixSource, Pipeline, Storage};
pub use crate::utils::error::Result;
