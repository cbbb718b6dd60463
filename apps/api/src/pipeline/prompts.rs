// Prompt templates for the five pipeline steps, one constant per step.
// Placeholders are `{field}` wire names substituted at render time; every
// placeholder must appear in the owning step's declared inputs or pipeline
// construction fails.

/// Step 1: condense the uploaded resume into a summary.
pub const ANALYZE_RESUME: &str = "analyze this resume:\n{resume}";

/// Step 2: assess the summarized resume against the job description.
pub const MATCH_JOB: &str = "match resume with job:\n{resume_summary}\n{job_description}";

/// Step 3: propose concrete edits to the original resume from the match
/// analysis.
pub const TAILOR_RESUME: &str = "suggest resume edits:\n{resume}\n{job_match}";

/// Step 4: draft a cover letter. Reads the summary, not the edited resume.
pub const WRITE_COVER_LETTER: &str =
    "write a cover letter for:\n{resume_summary}\n{job_description}";

/// Step 5: draft a 60-second spoken pitch for the target title.
pub const WRITE_PITCH: &str = "write a 60 second pitch for:\n{resume_summary}\n{job_title}";
