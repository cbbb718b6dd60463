//! Pipeline engine: executes the fixed workflow against one state record.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::llm_client::TextGenerator;

use super::state::{WorkflowState, REQUIRED_INPUTS};
use super::steps::{self, Step, WORKFLOW};
use super::PipelineError;

/// The pipeline engine.
///
/// Owns the text-generation backend handle and the validated step list;
/// holds nothing else. `run` is stateless between invocations, so one
/// engine instance serves any number of concurrent runs, each with its own
/// exclusive state.
pub struct Pipeline {
    steps: Vec<Step>,
    backend: Arc<dyn TextGenerator>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `backend` is a trait object without a `Debug` bound
        f.debug_struct("Pipeline")
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Builds the engine over the fixed workflow.
    ///
    /// Every step template is checked against its declared inputs and the
    /// dependency order here, so an unbound placeholder is a startup
    /// configuration error rather than a mid-run surprise.
    pub fn new(backend: Arc<dyn TextGenerator>) -> Result<Self, PipelineError> {
        Self::with_steps(WORKFLOW.to_vec(), backend)
    }

    /// Builds an engine over an explicit step list. Production code uses
    /// [`Pipeline::new`]; this is the seam for exercising other shapes.
    pub fn with_steps(
        steps: Vec<Step>,
        backend: Arc<dyn TextGenerator>,
    ) -> Result<Self, PipelineError> {
        steps::validate(&steps)?;
        Ok(Self { steps, backend })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs every step in declared order against `state` and returns the
    /// fully populated record.
    ///
    /// Fails with `MissingInput` before any backend call if a caller input
    /// is absent. A backend error aborts the run at the failing step with
    /// no retry; the partially written state is dropped with the run, so
    /// callers see either a complete record or an error, never both.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, PipelineError> {
        for field in REQUIRED_INPUTS {
            if !state.contains(field) {
                return Err(PipelineError::MissingInput(field));
            }
        }

        for step in &self.steps {
            let prompt = step.render_prompt(&state)?;
            debug!("step '{}': sending {} prompt chars", step.name, prompt.len());

            let completion = self
                .backend
                .generate(&prompt)
                .await
                .map_err(|source| PipelineError::Backend {
                    step: step.name,
                    source,
                })?;

            let text = completion.into_text();
            info!("step '{}' complete ({} chars into '{}')", step.name, text.len(), step.output);
            state.set(step.output, text)?;
        }

        Ok(state)
    }
}
