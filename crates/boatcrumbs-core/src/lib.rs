pub mod config;
pub mod error;
pub mod geodesy;
pub mod kinematics;
pub mod movement;
pub mod pipeline;
pub mod range;
pub mod segments;
pub mod stops;
pub mod summary;
pub mod timezone;
pub mod types;

pub use config::{LookBack, PipelineConfig};
pub use error::{Result, TrackError};
pub use pipeline::{PipelineMode, TrackPipeline};
pub use types::{AnnotatedFix, RawFix, RetainedFix};
