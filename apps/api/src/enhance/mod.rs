//! AI text enhancement: polishes a short CV fragment through the LLM client.
//!
//! The contract callers rely on: the original text always comes back on
//! failure. Short input is rejected locally without touching the network,
//! and every remote failure is folded into an unsuccessful response.
//! Nothing here mutates the document; callers write the result back.

use serde::Serialize;
use tracing::{info, warn};

use crate::enhance::prompts::{
    EDUCATION_DIRECTIVES, ENHANCE_PROMPT_TEMPLATE, GENERIC_DIRECTIVES, PROJECT_DIRECTIVES,
    SKILLS_DIRECTIVES, SUMMARY_DIRECTIVES, WORK_EXPERIENCE_DIRECTIVES,
};
use crate::llm_client::prompts::{CV_WRITER_PERSONA, PLAIN_TEXT_ONLY};
use crate::llm_client::{LlmClient, LlmError};
use crate::store::Notification;

pub mod handlers;
pub mod prompts;

/// Inputs shorter than this (after trimming, in characters) are not sent.
pub const MIN_ENHANCE_CHARS: usize = 10;

const TOO_SHORT_MESSAGE: &str = "Text is too short to enhance (minimum 10 characters)";
const REMOTE_FAILURE_MESSAGE: &str = "Failed to enhance text. Please try again.";
const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Which part of the CV a fragment belongs to. Drives the prompt directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhanceRole {
    ProfessionalSummary,
    WorkExperience,
    Education,
    ProjectDescription,
    Skills,
    /// Any other tag; kept so the prompt can still name it.
    Other(String),
}

impl EnhanceRole {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "professional summary" => Self::ProfessionalSummary,
            "work experience" => Self::WorkExperience,
            "education" => Self::Education,
            "project description" => Self::ProjectDescription,
            "skills" => Self::Skills,
            "" => Self::Other("resume".to_string()),
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::ProfessionalSummary => "professional summary",
            Self::WorkExperience => "work experience",
            Self::Education => "education",
            Self::ProjectDescription => "project description",
            Self::Skills => "skills",
            Self::Other(tag) => tag,
        }
    }

    pub fn directives(&self) -> &'static str {
        match self {
            Self::ProfessionalSummary => SUMMARY_DIRECTIVES,
            Self::WorkExperience => WORK_EXPERIENCE_DIRECTIVES,
            Self::Education => EDUCATION_DIRECTIVES,
            Self::ProjectDescription => PROJECT_DIRECTIVES,
            Self::Skills => SKILLS_DIRECTIVES,
            Self::Other(_) => GENERIC_DIRECTIVES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub enhanced_text: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EnhanceResponse {
    fn failed(original: &str, message: &str) -> Self {
        Self {
            enhanced_text: original.to_string(),
            success: false,
            message: Some(message.to_string()),
        }
    }
}

/// Enhancement as the editor sees it: the text to put back in the field plus
/// the notifications to show along the way.
#[derive(Debug, Clone, Serialize)]
pub struct EditorEnhancement {
    pub text: String,
    pub success: bool,
    pub notifications: Vec<Notification>,
}

/// Builds the full instruction sent to the model.
pub fn build_prompt(text: &str, role: &EnhanceRole, context: &str) -> String {
    fill_template(
        ENHANCE_PROMPT_TEMPLATE,
        &[
            ("persona", CV_WRITER_PERSONA),
            ("role", role.tag()),
            ("directives", role.directives()),
            ("context", context),
            ("text", text),
            ("plain_text_only", PLAIN_TEXT_ONLY),
        ],
    )
}

/// Single-pass `{key}` substitution, so user text containing braces is never
/// re-expanded.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let matched = values.iter().find_map(|(key, value)| {
            tail.strip_prefix(key)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match matched {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Clone)]
pub struct EnhancementClient {
    llm: LlmClient,
}

impl EnhancementClient {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// One attempt at polishing `text`. Never fails: on any problem the
    /// original text is returned with `success: false`.
    pub async fn enhance(&self, text: &str, role_tag: &str, context: &str) -> EnhanceResponse {
        if text.trim().chars().count() < MIN_ENHANCE_CHARS {
            return EnhanceResponse::failed(text, TOO_SHORT_MESSAGE);
        }

        let role = EnhanceRole::from_tag(role_tag);
        let prompt = build_prompt(text, &role, context);
        info!(
            "Enhancing {} text ({} chars) with {}",
            role.tag(),
            text.chars().count(),
            self.llm.model()
        );

        match self.llm.complete(&prompt).await {
            Ok(enhanced_text) => EnhanceResponse {
                enhanced_text,
                success: true,
                message: None,
            },
            Err(e @ LlmError::Api { .. }) => {
                warn!("Enhancement rejected by provider: {e}");
                EnhanceResponse::failed(text, REMOTE_FAILURE_MESSAGE)
            }
            Err(e) => {
                warn!("Enhancement failed: {e}");
                EnhanceResponse::failed(text, UNEXPECTED_FAILURE_MESSAGE)
            }
        }
    }

    /// Wraps [`enhance`](Self::enhance) with the progress and outcome
    /// notifications the editor shows, and returns the text to use.
    pub async fn enhance_for_editor(
        &self,
        text: &str,
        role_tag: &str,
        context: &str,
    ) -> EditorEnhancement {
        let mut notifications = vec![Notification::info(
            "Enhancing text",
            "AI is working on improving your text...",
        )];

        let response = self.enhance(text, role_tag, context).await;

        if response.success {
            notifications.push(Notification::info(
                "Enhancement complete",
                "Your text has been professionally enhanced",
            ));
        } else {
            notifications.push(Notification::destructive(
                "Enhancement failed",
                response
                    .message
                    .clone()
                    .unwrap_or_else(|| REMOTE_FAILURE_MESSAGE.to_string()),
            ));
        }

        EditorEnhancement {
            text: response.enhanced_text,
            success: response.success,
            notifications,
        }
    }
}
