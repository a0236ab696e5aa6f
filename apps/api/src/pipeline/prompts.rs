// All prompt templates for the pipeline stages, one versioned template per stage.
// Bump `version` whenever a template's wording changes.

use crate::llm_client::prompts::PromptTemplate;

/// Vault seeding. Replace: {document_text}
pub const SEED_VAULT: PromptTemplate = PromptTemplate {
    stage: "seed_vault",
    version: 1,
    body: r#"You are the Jobberly Career Vault builder. Read the document below and produce a structured career summary.

Sections, in this order:
- HEADLINE: one line naming the candidate's current role and seniority
- EXPERIENCE: each role with employer, title, dates and 2-4 achievements (keep every number exactly as written)
- SKILLS: grouped by category
- EDUCATION & CERTIFICATIONS
- PROOF POINTS: the strongest quantified outcomes

Only restate what the document says. Do NOT add employers, dates, metrics or skills that are not in it.

DOCUMENT:
{document_text}"#,
};

/// Listing analysis. Replace: {grounding_instruction}, {vault}, {listing_text}
pub const ANALYZE_LISTING: PromptTemplate = PromptTemplate {
    stage: "analyze_listing",
    version: 1,
    body: r#"You are the Jobberly Deception Decoder. Analyze the job listing below for the candidate.

Report on:
1. Ghost Score: 0-100 probability that the listing is fake or stale, with the signals you used.
2. Internal-Hire Signals: does this look like a compliance posting for an internal candidate?
3. Budget Prediction: estimated salary range based on the company's stage and the role.
4. Purple Squirrel Check: are the requirements unrealistic for one person?
5. Candidate Fit: how the candidate's vault lines up with the must-haves, and the gaps.

{grounding_instruction}

CAREER VAULT:
{vault}

JOB LISTING:
{listing_text}

End your answer with exactly one final line in this form:
COMPANY_NAME: <the hiring company's name, or UNKNOWN>"#,
};

/// Fallback company-name extraction. Replace: {report}, {listing_text}
pub const EXTRACT_COMPANY: PromptTemplate = PromptTemplate {
    stage: "extract_company",
    version: 1,
    body: r#"Which company is hiring for the job listing below?
Reply with the company name only, on a single line, with no punctuation or explanation.
If the listing does not say, reply with UNKNOWN.

LISTING:
{listing_text}

ANALYSIS:
{report}"#,
};

/// Company research. Replace: {company}, {grounding_instruction}, {vault}
pub const RESEARCH_COMPANY: PromptTemplate = PromptTemplate {
    stage: "research_company",
    version: 1,
    body: r#"You are the Jobberly Strategic Intel analyst. Research {company} for a candidate preparing to apply.

Provide:
1. Current Market Stage (e.g. Series B, Mature, Public).
2. Likely Competitive Pain Points: the "bleeding neck" problems the company is trying to solve.
3. Where the candidate's proven experience maps onto those pain points.
4. A 3-Minute Interview Script focused on solving the company's specific challenges.

{grounding_instruction}

CAREER VAULT:
{vault}"#,
};

/// Decision-maker discovery. Replace: {company}
pub const IDENTIFY_CONTACTS: PromptTemplate = PromptTemplate {
    stage: "identify_contacts",
    version: 1,
    body: r#"List up to 5 likely hiring managers or decision makers at {company} for a candidate's application.

Return one person per line in EXACTLY this format and nothing else:
Name | Title"#,
};

/// Outreach drafting. Replace: {recipient}, {company}, {char_budget}, {grounding_instruction}, {vault}
pub const DRAFT_OUTREACH: PromptTemplate = PromptTemplate {
    stage: "draft_outreach",
    version: 1,
    body: r#"Write a personalized LinkedIn connection request to {recipient} at {company}.

Rules:
- At most {char_budget} characters so it fits a standard invite.
- Lead with a problem the candidate can solve, not a favor to ask.
- Be direct and tactical. No greetings longer than one word.

{grounding_instruction}

CAREER VAULT:
{vault}"#,
};

/// Interview probe. Replace: {statement}, {vault}
pub const INTERVIEW_PROBE: PromptTemplate = PromptTemplate {
    stage: "interview_probe",
    version: 1,
    body: r#"You are the Jobberly Advocate interviewing a candidate to build their proof-based profile.

The candidate said: "{statement}"

What the vault already knows:
{vault}

Ask ONE probing, evidence-based question that uncovers the specific impact of this work on metrics such as revenue, burn rate or operational speed. Reply with the question only."#,
};

/// Application assembly. Replace: {grounding_instruction}, {vault}, {listing_text},
/// {listing_analysis}, {research_notes}, {separator}
pub const ASSEMBLE_APPLICATION: PromptTemplate = PromptTemplate {
    stage: "assemble_application",
    version: 1,
    body: r#"You are the Jobberly Application Architect. Write a tailored resume and a cover letter for the job below.

{grounding_instruction}

CAREER VAULT:
{vault}

JOB LISTING:
{listing_text}

LISTING ANALYSIS:
{listing_analysis}

COMPANY RESEARCH:
{research_notes}

Format:
- Resume first. Section headings on their own line in ALL CAPS. Bullets start with "- ".
- Then a line containing only {separator}
- Then the cover letter, at most 350 words, addressed to the hiring team.
Plain text only. No tables."#,
};

/// Stands in for research notes that were never produced.
pub const NO_RESEARCH_PLACEHOLDER: &str = "(No company research available.)";

/// Character budget requested from the model for outreach notes. Not enforced locally.
pub const OUTREACH_CHAR_BUDGET: usize = 300;
