// ATS compatibility analysis: feature extraction, rubric catalogue, scoring.
// Everything in here is pure and synchronous; no I/O, no shared state.

pub mod keywords;
pub mod rubric;
pub mod scoring;
pub mod signals;
