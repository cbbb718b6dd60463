//! The fixed five-step workflow: step declarations and the
//! construction-time checks that make run-time surprises impossible.

use super::prompts;
use super::state::{Field, WorkflowState, REQUIRED_INPUTS};
use super::template;
use super::PipelineError;

/// One named unit of work: reads `inputs` from the state, sends the
/// rendered `template` to the text-generation backend, writes the response
/// under `output`. Steps are immutable and defined once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub inputs: &'static [Field],
    pub output: Field,
    pub template: &'static str,
}

impl Step {
    /// Renders this step's prompt from the current state.
    pub fn render_prompt(&self, state: &WorkflowState) -> Result<String, PipelineError> {
        template::render(self.template, self.inputs, state).map_err(|field| {
            PipelineError::UnsatisfiedDependency {
                step: self.name,
                field,
            }
        })
    }
}

/// The workflow, in execution order.
///
/// The chain is linear even though `write_cover_letter` and `write_pitch`
/// read only the summary (plus their caller input) and not `job_match` or
/// `resume_edits`. They still run after tailoring so the backend call
/// order stays stable for callers that trace it.
pub const WORKFLOW: [Step; 5] = [
    Step {
        name: "analyze_resume",
        inputs: &[Field::Resume],
        output: Field::ResumeSummary,
        template: prompts::ANALYZE_RESUME,
    },
    Step {
        name: "match_job",
        inputs: &[Field::ResumeSummary, Field::JobDescription],
        output: Field::JobMatch,
        template: prompts::MATCH_JOB,
    },
    Step {
        name: "tailor_resume",
        inputs: &[Field::Resume, Field::JobMatch],
        output: Field::ResumeEdits,
        template: prompts::TAILOR_RESUME,
    },
    Step {
        name: "write_cover_letter",
        inputs: &[Field::ResumeSummary, Field::JobDescription],
        output: Field::CoverLetter,
        template: prompts::WRITE_COVER_LETTER,
    },
    Step {
        name: "write_pitch",
        inputs: &[Field::ResumeSummary, Field::JobTitle],
        output: Field::Pitch,
        template: prompts::WRITE_PITCH,
    },
];

/// Validates a step list at construction time.
///
/// Three checks, in order per step: every identifier-shaped template
/// placeholder names a declared input; every declared input is either a
/// caller input or the output of an earlier step; no step writes a field
/// that is already written. Passing here means a run can only fail on a
/// missing caller input or a backend error.
pub fn validate(steps: &[Step]) -> Result<(), PipelineError> {
    let mut available: Vec<Field> = REQUIRED_INPUTS.to_vec();

    for step in steps {
        for name in template::placeholders(step.template) {
            match Field::from_name(name) {
                Some(field) if step.inputs.contains(&field) => {}
                _ => {
                    return Err(PipelineError::UnboundPlaceholder {
                        step: step.name,
                        placeholder: name.to_string(),
                    })
                }
            }
        }

        for &field in step.inputs {
            if !available.contains(&field) {
                return Err(PipelineError::UnsatisfiedDependency {
                    step: step.name,
                    field,
                });
            }
        }

        if available.contains(&step.output) {
            return Err(PipelineError::FieldOverwrite(step.output));
        }
        available.push(step.output);
    }

    Ok(())
}
