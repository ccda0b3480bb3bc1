// Enhancement prompt templates.
// All prompts for the enhance module are defined here.

pub const SUMMARY_DIRECTIVES: &str = "\
Focus on creating a compelling 3-4 sentence professional summary that:
- Starts with a strong opener highlighting years of experience or expertise
- Mentions key skills and accomplishments relevant to the target role
- Includes career goals or passion statement
- Uses powerful, confident language without being verbose
- Avoids clichés and generic statements";

pub const WORK_EXPERIENCE_DIRECTIVES: &str = "\
Focus on creating impactful bullet points that:
- Begin with strong action verbs in past tense (or present for current positions)
- Include specific metrics, percentages, or numbers whenever possible
- Highlight achievements and results rather than just responsibilities
- Align with industry keywords and terminology
- Are concise (1-2 lines each)";

pub const EDUCATION_DIRECTIVES: &str = "\
Focus on highlighting educational achievements and relevant coursework:
- Include academic honors, high GPA if applicable
- Mention relevant coursework, projects, or thesis topics
- Include extracurricular activities if they demonstrate leadership or relevant skills
- Format consistently and professionally";

pub const PROJECT_DIRECTIVES: &str = "\
Focus on showcasing project highlights:
- Begin with the project's purpose or business problem solved
- Highlight technologies/methods used and your specific role
- Emphasize results, impact, or user benefits
- Include team size and your contributions if relevant";

pub const SKILLS_DIRECTIVES: &str = "\
Focus on creating a clear, organized skills section:
- Group similar skills together (technical, soft, domain knowledge)
- List most relevant skills first
- Use industry-standard terminology
- Be specific rather than generic";

pub const GENERIC_DIRECTIVES: &str = "\
Focus on creating professional, achievement-oriented content that:
- Uses strong action verbs
- Includes specific metrics where possible
- Aligns with industry standards
- Is concise and impactful";

/// Enhancement prompt template.
/// Replace: {persona}, {role}, {directives}, {context}, {text}, {plain_text_only}
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"{persona}
Your task is to improve the following {role} text for a CV/resume.

{directives}

Additional context about this content: {context}

Original text:
"{text}"

Enhance this text to be more impressive while:
- Maintaining professional tone and factual accuracy
- Ensuring content is appropriate for the section type ({role})
- Keeping similar length to the original
- Making it sound human and authentic, not overly formal or robotic
- Avoiding vague superlatives without evidence

{plain_text_only}"#;
