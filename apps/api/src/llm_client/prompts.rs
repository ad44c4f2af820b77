// Prompt builders for job analysis, CV tailoring and cover letters.
// All prompts that expect structured output pair with `LlmClient::call_json`.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for plain-text cover letter output.
pub const COVER_LETTER_SYSTEM: &str = "You are an expert cover letter writer. \
    Respond with the letter body only: no subject line, no surrounding \
    commentary, no markdown formatting.";

/// Prompt for analyzing a job description against the candidate's profile.
/// The response must match `JobAnalysis`.
pub fn build_job_analysis_prompt(profile_json: &str, job_description: &str) -> String {
    format!(
        r#"You are a career advisor analyzing job fit. Compare the candidate's profile with the job requirements.

Candidate Profile (JSON Resume format):
{profile_json}

Job Description:
{job_description}

Analyze the candidate's fit for this role. Consider:
1. Technical skills and their proficiency levels
2. Work experience relevance and seniority
3. Education background
4. Projects that demonstrate relevant abilities
5. Certifications that add value

Return a JSON object with exactly these fields:
- "match_score": integer 0-100 (be realistic, not overly generous)
- "matching_skills": array of skills the candidate has that match the job
- "missing_skills": array of skills the job requires that the candidate may lack
- "relevant_experiences": array of experiences from their background relevant to this job
- "suggestions": array of actionable suggestions for tailoring their CV
- "keywords_to_include": array of important keywords from the job description to include

Focus on being helpful and constructive. If the match isn't perfect, suggest how to best present their existing experience."#
    )
}

/// Prompt for producing a tailored JSON-Resume document.
pub fn build_cv_tailoring_prompt(
    profile_json: &str,
    job_description: &str,
    analysis_json: &str,
) -> String {
    format!(
        r#"You are an expert resume writer. Create a tailored resume based on the candidate's master profile and the target job.

Master Profile (JSON Resume format):
{profile_json}

Target Job Description:
{job_description}

Job Analysis:
{analysis_json}

Create a tailored JSON Resume that:
1. Rewrites the summary to directly address the job requirements and highlight the most relevant qualifications
2. Reorders work experience to put the most relevant positions first
3. Adjusts work experience highlights to emphasize accomplishments relevant to this job
4. Prioritizes and reorders skills to put the most relevant ones first
5. Includes relevant projects that demonstrate required abilities
6. Incorporates keywords from the job description naturally

CRITICAL RULES:
- Do NOT invent or fabricate any experience, education, skills, or achievements
- Only use information that exists in the original profile
- You may rephrase and emphasize existing content, but never add fictional content
- Quantify achievements where data exists in the original profile
- Keep all dates, company names, and factual information accurate

Return a valid JSON Resume document and nothing else."#
    )
}

/// Prompt for generating a cover letter. `cv_summary` may be empty.
pub fn build_cover_letter_prompt(
    profile_json: &str,
    job_title: &str,
    company_name: &str,
    job_description: &str,
    cv_summary: &str,
) -> String {
    let summary_block = if cv_summary.trim().is_empty() {
        String::new()
    } else {
        format!("\nTailored CV Summary:\n{cv_summary}\n")
    };
    format!(
        r#"Write a professional cover letter for the position of {job_title} at {company_name}.

Candidate Profile (JSON Resume format):
{profile_json}

Job Description:
{job_description}
{summary_block}
Guidelines:
1. Three to four paragraphs, roughly 250-350 words
2. Open with genuine interest in the specific role and company
3. Connect the candidate's strongest relevant experience to the job requirements
4. Close with a confident call to action
5. Use only facts present in the profile; never invent experience
6. Address it to the hiring team; do not include placeholder fields like [Hiring Manager Name]"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_inputs() {
        let prompt = build_job_analysis_prompt("{\"basics\":{}}", "Rust engineer wanted");
        assert!(prompt.contains("{\"basics\":{}}"));
        assert!(prompt.contains("Rust engineer wanted"));
        assert!(prompt.contains("match_score"));
    }

    #[test]
    fn test_cover_letter_prompt_omits_empty_summary_block() {
        let prompt = build_cover_letter_prompt("{}", "Engineer", "Acme", "Build things", "");
        assert!(!prompt.contains("Tailored CV Summary"));
        let with = build_cover_letter_prompt("{}", "Engineer", "Acme", "Build things", "Did X");
        assert!(with.contains("Tailored CV Summary"));
    }
}
