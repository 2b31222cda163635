/// Business logic services layer
pub mod artifacts;
pub mod estimator;
pub mod registry;
pub mod report;

pub use artifacts::{render_csv, ArtifactStore};
pub use estimator::{ActivityEstimator, ReportWindow};
pub use registry::{ReportJob, ReportRegistry};
pub use report::ReportService;
