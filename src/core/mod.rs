mod classifier;
mod engine;
mod explain;
mod extractor;
mod history;
mod pipeline;
mod types;

pub use classifier::classify;
pub use engine::compute;
pub use explain::explain;
pub use extractor::{DEFAULT_RATE, DEFAULT_YEARS, extract};
pub use history::HistoryEntry;
pub use pipeline::{
    APOLOGY, Assessment, GREETING, MAX_YEARS, PipelineError, compute_on_worker, compute_result,
    process_on_worker, process_text, render_answer, try_process_on_worker, validate_params,
};
pub use types::{CalculationCategory, ParameterRecord, ResultRecord};
