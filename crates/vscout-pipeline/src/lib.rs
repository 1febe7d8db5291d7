//! Batch orchestration: results files in, registry updates, opportunities
//! and events out.

pub mod detector;
pub mod error;
pub mod events;
pub mod export;
pub mod input;
pub mod plan;
pub mod process;

pub use detector::{classify, detect_opportunity, Trigger};
pub use error::PipelineError;
pub use events::{EventSink, PipelineEvent, TracingSink};
pub use export::export_active_venues;
pub use input::{parse_results, read_results_file, ResultRecord};
pub use plan::QueryPlan;
pub use process::{BatchSummary, FileFailure, Processor, RunSummary};
