//! The pipeline core: a fixed five-step prompt chain over an append-only
//! state record.
//!
//! Flow: analyze_resume → match_job → tailor_resume → write_cover_letter →
//!       write_pitch.
//!
//! Each step reads its declared input fields from the state, renders a
//! prompt template, sends it through the text-generation client, and writes
//! the response under its output field. Steps run strictly in declared
//! order; a backend failure aborts the run at that step and the partial
//! state dies with it.

pub mod engine;
pub mod prompts;
pub mod state;
pub mod steps;
pub mod template;

pub use engine::Pipeline;
pub use state::{Field, WorkflowState};

use thiserror::Error;

use crate::llm_client::LlmError;

/// Errors from pipeline construction or a run.
///
/// Construction catches configuration mistakes: templates referencing
/// undeclared placeholders and steps reading fields nothing writes. A run
/// fails only on a missing caller input or a backend error, and a failed
/// run aborts at the failing step with no retry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required caller input was absent. Raised before any backend call.
    #[error("missing required input field '{0}'")]
    MissingInput(Field),

    /// The text-generation call failed at a step. The run aborts here;
    /// later steps never execute.
    #[error("step '{step}' failed: {source}")]
    Backend {
        step: &'static str,
        #[source]
        source: LlmError,
    },

    /// A step template references a placeholder outside the step's declared
    /// inputs. Caught when the pipeline is constructed, never at run time.
    #[error("step '{step}' template references undeclared placeholder '{{{placeholder}}}'")]
    UnboundPlaceholder {
        step: &'static str,
        placeholder: String,
    },

    /// A step reads a field that neither the caller supplies nor any
    /// earlier step writes. Caught when the pipeline is constructed.
    #[error("step '{step}' reads '{field}' before it is written")]
    UnsatisfiedDependency { step: &'static str, field: Field },

    /// The state record is append-only; a second write to the same field
    /// is rejected.
    #[error("field '{0}' would be written twice")]
    FieldOverwrite(Field),
}
