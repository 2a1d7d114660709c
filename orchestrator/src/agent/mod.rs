use thiserror::Error;

mod llm;
mod parser;
mod planner;

pub use llm::{ChatMessage, ChatModel, OpenAiChat};
pub use planner::PlanningAgent;

// The two tool names the reasoning loop may dispatch on
pub const TOOL_WEB_SEARCH: &str = "WebSearch";
pub const TOOL_WEATHER: &str = "Weather";
pub const FINAL_ANSWER: &str = "Final Answer";

/// Failures of the reasoning capability itself. Tool failures never show
/// up here; they flow back to the model as observations.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,

    #[error("chat backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("chat backend returned no completion")]
    EmptyCompletion,

    #[error("agent stopped after {0} reasoning steps without a final answer")]
    StepLimit(usize),
}
