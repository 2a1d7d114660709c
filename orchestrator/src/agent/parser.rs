use serde_json::{Map, Value};
use tracing::debug;

use super::{FINAL_ANSWER, TOOL_WEATHER, TOOL_WEB_SEARCH};
use crate::models::Plan;

const JSON_PARSE_ERROR: &str = "JSON parsing failed";

/// One decoded decision of the reasoning capability.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    CallSearch(String),
    CallWeather(String),
    Finish(String),
}

/// The first `{` through the last `}` of the text, if both exist.
/// Deliberately greedy: models wrap their JSON in prose on both sides.
fn brace_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Decodes a model response into an [`AgentStep`].
///
/// Anything that is not a well-formed `{"action": ..., "action_input": ...}`
/// object naming one of the two tools degrades to `Finish` with the raw
/// text, so malformed intermediate output never aborts the loop.
pub fn parse_step(text: &str) -> AgentStep {
    let Some(block) = brace_block(text) else {
        return AgentStep::Finish(text.to_string());
    };
    let Ok(value) = serde_json::from_str::<Value>(block) else {
        debug!("Malformed action JSON in model output, treating as final answer");
        return AgentStep::Finish(text.to_string());
    };
    let Some(action) = value.get("action").and_then(Value::as_str) else {
        return AgentStep::Finish(text.to_string());
    };

    // An object input is re-serialized so tools always see text
    let input = match value.get("action_input") {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None => String::new(),
    };

    match action {
        TOOL_WEB_SEARCH => AgentStep::CallSearch(input),
        TOOL_WEATHER => AgentStep::CallWeather(input),
        FINAL_ANSWER => AgentStep::Finish(input),
        _ => {
            debug!("Unknown action '{}', treating as final answer", action);
            AgentStep::Finish(text.to_string())
        }
    }
}

/// Best-effort structured decode of the model's final answer.
///
/// Lenient by design: the model is not guaranteed to emit clean JSON, so
/// this scans for a brace block instead of requiring the whole text to
/// parse, and degrades to a raw-text plan that stays renderable.
pub fn extract_plan(text: &str) -> Plan {
    match brace_block(text) {
        Some(block) => match serde_json::from_str::<Map<String, Value>>(block) {
            Ok(map) => {
                debug!("Parsed structured plan from final answer");
                Plan::Structured(map)
            }
            Err(e) => {
                debug!("Plan JSON parsing failed: {}", e);
                Plan::RawWithError {
                    plan: text.to_string(),
                    error: JSON_PARSE_ERROR.to_string(),
                }
            }
        },
        None => {
            debug!("No JSON found in final answer, returning raw text");
            Plan::Raw {
                plan: text.to_string(),
            }
        }
    }
}
