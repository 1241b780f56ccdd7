// Rewrite prompt constants used by `fix_cv`.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for the CV rewrite. Plain text out, no commentary.
pub const REWRITE_SYSTEM: &str = "You are an expert CV editor who optimises CVs for \
    applicant tracking systems. \
    You MUST respond with the complete rewritten CV as plain text only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations, notes, or a preamble.";

/// Rewrite prompt template.
/// Replace: {factuality_instruction}, {issues}, {min_words}, {max_words},
///          {keyword_guidance}, {cv_text}
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"{factuality_instruction}

Rewrite the CV below so that it resolves every issue in this list:
{issues}

NON-NEGOTIABLE CONSTRAINTS:
1. Preserve every factual claim: employers, titles, dates, qualifications, and numbers stay as written
2. Do NOT invent skills, tools, employers, responsibilities, or experience
3. Keep the email address, phone number, and any profile links present in the contact line
4. Use bullet points ("• ") for responsibilities and achievements, each starting with a strong action verb (Led, Built, Delivered, Reduced, Automated, ...)
5. Include at least one quantified metric per major bullet where the original supports it; never fabricate a number
6. Use clear section headings: PROFESSIONAL SUMMARY, EXPERIENCE, EDUCATION, SKILLS
7. Keep the total length between {min_words} and {max_words} words
{keyword_guidance}
ORIGINAL CV (verbatim):
{cv_text}"#;

/// Appended when a job description was supplied.
/// Replace: {keywords}
pub const KEYWORD_GUIDANCE_TEMPLATE: &str = "8. The target role uses these terms: {keywords}. \
    Mention a term ONLY if the original CV already shows that experience\n";
