// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Prepended to every rewrite instruction.
pub const FACTUALITY_INSTRUCTION: &str = "\
    CRITICAL: You are editing a real person's CV. Every statement in your output must be \
    supported by the original text. Do NOT infer, interpolate, or invent details. \
    If the original does not support a claim, leave it out. \
    Rephrasing and restructuring are allowed; adding facts is not.";
