// Prompt templates for résumé analysis.
// Placeholders are replaced in one pass by `fill`, so résumé text that happens
// to contain `{job_description}` is never re-expanded.

/// ATS evaluation prompt. The reply shape here is what `interpreter` decodes.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Act as a professional ATS (Application Tracking System) specialized in tech roles like software engineering, data science, analytics, and big data.
Evaluate the following resume against the job description. Be very strict and accurate.
Provide:
1. JD Match percentage
2. Missing Keywords (important ones not in resume)
3. Short Profile Summary

Output only in this JSON format:
{"JD Match":"%","MissingKeywords":[],"Profile Summary":""}

Resume:
{resume_text}

Job Description:
{job_description}
"#;

/// Free-text improvement suggestions. The reply is shown as-is.
pub const IMPROVEMENT_PROMPT_TEMPLATE: &str = r#"Suggest 5 improvements to boost the following resume for the given job description.
The suggestions should be actionable and help the candidate improve their chances of matching the job description.

Resume:
{resume_text}

Job Description:
{job_description}
"#;

pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    fill(ANALYSIS_PROMPT_TEMPLATE, resume_text, job_description)
}

pub fn build_improvement_prompt(resume_text: &str, job_description: &str) -> String {
    fill(IMPROVEMENT_PROMPT_TEMPLATE, resume_text, job_description)
}

fn fill(template: &str, resume_text: &str, job_description: &str) -> String {
    let (head, rest) = template
        .split_once("{resume_text}")
        .unwrap_or((template, ""));
    let (middle, tail) = rest.split_once("{job_description}").unwrap_or((rest, ""));

    let mut prompt =
        String::with_capacity(template.len() + resume_text.len() + job_description.len());
    prompt.push_str(head);
    prompt.push_str(resume_text);
    prompt.push_str(middle);
    prompt.push_str(job_description);
    prompt.push_str(tail);
    prompt
}
