//! Prompt templates: `{field}` placeholder substitution against the state.
//!
//! Rendering is a single left-to-right pass, so brace sequences inside
//! substituted values are never re-scanned. Tokens that do not name a
//! state field are emitted verbatim; [`placeholders`] backs the
//! construction-time check that every identifier-shaped token is a
//! declared input.

use super::state::{Field, WorkflowState};

/// Extracts the identifier-shaped placeholder tokens of a template, in
/// order of first appearance, without duplicates.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                if is_placeholder_name(name) && !found.contains(&name) {
                    found.push(name);
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    found
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

/// Renders `template` in one pass, substituting each `{field}` token whose
/// field appears in `inputs` with its value from `state`.
///
/// Returns the first input field that is missing from the state, if any.
/// Callers validate templates at construction time, so for a running
/// pipeline this never fires.
pub fn render(
    template: &str,
    inputs: &[Field],
    state: &WorkflowState,
) -> Result<String, Field> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let token = after.find('}').map(|close| &after[..close]);
        match token.and_then(Field::from_name) {
            Some(field) if inputs.contains(&field) => {
                match state.get(field) {
                    Some(value) => out.push_str(value),
                    None => return Err(field),
                }
                // skip past "{name}"
                rest = &after[field.name().len() + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
