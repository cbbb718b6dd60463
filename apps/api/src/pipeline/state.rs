#![allow(dead_code)]

//! Workflow state: the shared field map threaded through the pipeline.
//!
//! One run owns exactly one `WorkflowState`. The record is append-only:
//! the caller seeds the three input fields, each step adds its single
//! output field, and nothing is ever overwritten.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use super::PipelineError;

/// A named slot in the workflow state: three caller inputs and five step
/// outputs, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Resume,
    JobDescription,
    JobTitle,
    ResumeSummary,
    JobMatch,
    ResumeEdits,
    CoverLetter,
    Pitch,
}

impl Field {
    /// Every field, in the order it becomes available during a run.
    pub const ALL: [Field; 8] = [
        Field::Resume,
        Field::JobDescription,
        Field::JobTitle,
        Field::ResumeSummary,
        Field::JobMatch,
        Field::ResumeEdits,
        Field::CoverLetter,
        Field::Pitch,
    ];

    /// The field's wire name, as used in templates and API responses.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Resume => "resume",
            Field::JobDescription => "job_description",
            Field::JobTitle => "job_title",
            Field::ResumeSummary => "resume_summary",
            Field::JobMatch => "job_match",
            Field::ResumeEdits => "resume_edits",
            Field::CoverLetter => "cover_letter",
            Field::Pitch => "pitch",
        }
    }

    /// Looks up a field by its wire name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three fields the caller must supply before a run starts.
pub const REQUIRED_INPUTS: [Field; 3] = [Field::Resume, Field::JobDescription, Field::JobTitle];

/// Append-only map of field → text, exclusively owned by a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    values: BTreeMap<Field, String>,
}

impl WorkflowState {
    /// An empty state. Callers seed inputs with [`WorkflowState::set`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A state seeded with the three caller inputs.
    pub fn with_inputs(
        resume: impl Into<String>,
        job_description: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Self {
        let mut values = BTreeMap::new();
        values.insert(Field::Resume, resume.into());
        values.insert(Field::JobDescription, job_description.into());
        values.insert(Field::JobTitle, job_title.into());
        Self { values }
    }

    /// Returns the value of `field`, if it has been written.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Writes `field`. The record is append-only: a second write to the
    /// same field is an error, not a replacement.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Result<(), PipelineError> {
        match self.values.entry(field) {
            Entry::Vacant(slot) => {
                slot.insert(value.into());
                Ok(())
            }
            Entry::Occupied(_) => Err(PipelineError::FieldOverwrite(field)),
        }
    }

    /// Number of fields written so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        assert_eq!(Field::from_name("salary"), None);
        assert_eq!(Field::from_name(""), None);
        assert_eq!(Field::from_name("Resume"), None);
    }

    #[test]
    fn test_set_then_get() {
        let mut state = WorkflowState::new();
        state.set(Field::Resume, "ten years of Rust").unwrap();
        assert_eq!(state.get(Field::Resume), Some("ten years of Rust"));
        assert_eq!(state.get(Field::Pitch), None);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_second_write_is_rejected() {
        let mut state = WorkflowState::new();
        state.set(Field::ResumeSummary, "first").unwrap();
        let err = state.set(Field::ResumeSummary, "second").unwrap_err();
        assert!(matches!(err, PipelineError::FieldOverwrite(Field::ResumeSummary)));
        // the original value survives
        assert_eq!(state.get(Field::ResumeSummary), Some("first"));
    }

    #[test]
    fn test_with_inputs_seeds_exactly_three_fields() {
        let state = WorkflowState::with_inputs("r", "jd", "jt");
        assert_eq!(state.len(), 3);
        assert_eq!(state.get(Field::Resume), Some("r"));
        assert_eq!(state.get(Field::JobDescription), Some("jd"));
        assert_eq!(state.get(Field::JobTitle), Some("jt"));
        for field in [Field::ResumeSummary, Field::JobMatch, Field::ResumeEdits] {
            assert!(!state.contains(field));
        }
    }

    #[test]
    fn test_required_inputs_are_the_caller_fields() {
        assert_eq!(
            REQUIRED_INPUTS,
            [Field::Resume, Field::JobDescription, Field::JobTitle]
        );
    }
}
