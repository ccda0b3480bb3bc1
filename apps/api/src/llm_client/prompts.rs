// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Persona line every CV-writing prompt opens with.
pub const CV_WRITER_PERSONA: &str =
    "You are an expert CV/resume writer specializing in enhancing professional content.";

/// Closing instruction that keeps the reply free of commentary.
pub const PLAIN_TEXT_ONLY: &str =
    "Provide ONLY the enhanced text with no additional comments or formatting.";
