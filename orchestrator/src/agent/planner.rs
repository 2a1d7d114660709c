use std::sync::Arc;

use tracing::{info, warn};

use super::llm::{ChatMessage, ChatModel};
use super::{parser, AgentError};
use crate::models::Plan;
use crate::tools::{SearchTool, WeatherTool};

const MAX_STEPS: usize = 8;
const SEARCH_RESULTS_PER_CALL: usize = 3;

/// Filler words stripped from weather-tool input before lookup.
const LOCATION_FILLERS: &[&str] = &["weather", "forecast", "temperature", "in", "for", "at"];
const LOCATION_PROMPT: &str = "Please provide a valid location name.";

const SYSTEM_PROMPT: &str = r#"You are a helpful planning assistant with access to these tools:

WebSearch: useful for searching the web for information about places, restaurants, attractions, events, etc.
Weather: useful for getting weather information for a specific location. Input should be a location name.

To use a tool, respond with exactly one JSON object:
{"action": "<tool name>", "action_input": "<tool input>"}

When you have gathered enough information, respond with:
{"action": "Final Answer", "action_input": "<your final plan>"}"#;

fn plan_prompt(goal: &str) -> String {
    format!(
        "Please help me create a detailed plan for the following goal:\n\n\
         Goal: {goal}\n\n\
         Use your available tools to gather necessary information and create a structured, \
         day-by-day plan. The plan should be practical, detailed, and include specific \
         recommendations where possible.\n\n\
         After gathering information, output your final plan in JSON format with days as \
         keys and activities as values."
    )
}

/// Drives one reasoning session per goal: compose the prompt, let the
/// model pick tools one at a time, then extract a plan from its final
/// answer. Constructed once per process and shared across interactions.
pub struct PlanningAgent {
    model: Arc<dyn ChatModel>,
    search: SearchTool,
    weather: WeatherTool,
    max_steps: usize,
}

impl PlanningAgent {
    pub fn new(model: Arc<dyn ChatModel>, search: SearchTool, weather: WeatherTool) -> Self {
        Self {
            model,
            search,
            weather,
            max_steps: MAX_STEPS,
        }
    }

    /// Never fails outward: every error path collapses into the
    /// `{"error": ...}` plan shape, and everything else is a best-effort
    /// plan the caller can render.
    pub async fn generate_plan(&self, goal: &str) -> Plan {
        info!("Starting plan generation for goal: {}", goal);

        match self.run(goal).await {
            Ok(answer) => parser::extract_plan(&answer),
            Err(e) => {
                warn!("Plan generation failed: {}", e);
                Plan::Failed {
                    error: format!("Failed to generate plan: {e}"),
                }
            }
        }
    }

    async fn run(&self, goal: &str) -> Result<String, AgentError> {
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(plan_prompt(goal)),
        ];

        for step in 1..=self.max_steps {
            let text = self.model.chat(&messages).await?;

            match parser::parse_step(&text) {
                parser::AgentStep::Finish(answer) => {
                    info!("Agent produced a final answer after {} step(s)", step);
                    return Ok(answer);
                }
                parser::AgentStep::CallSearch(query) => {
                    info!("Agent step {}: WebSearch({})", step, query);
                    let outcome = self.search.search(&query, SEARCH_RESULTS_PER_CALL).await;
                    let observation = serialize_observation(&outcome);
                    messages.push(ChatMessage::assistant(text));
                    messages.push(ChatMessage::user(format!("Observation: {observation}")));
                }
                parser::AgentStep::CallWeather(input) => {
                    info!("Agent step {}: Weather({})", step, input);
                    let observation = self.lookup_weather(&input).await;
                    messages.push(ChatMessage::assistant(text));
                    messages.push(ChatMessage::user(format!("Observation: {observation}")));
                }
            }
        }

        Err(AgentError::StepLimit(self.max_steps))
    }

    /// Strips filler words from the model's weather input; an input that
    /// was nothing but filler short-circuits to a fixed prompt instead of
    /// a provider call.
    async fn lookup_weather(&self, input: &str) -> String {
        let location = strip_location(input);
        if location.is_empty() {
            warn!("Could not extract location from input");
            return LOCATION_PROMPT.to_string();
        }
        serialize_observation(&self.weather.get_weather(&location).await)
    }
}

fn serialize_observation<T: serde::Serialize>(outcome: &T) -> String {
    serde_json::to_string(outcome)
        .unwrap_or_else(|e| format!("tool output could not be serialized: {e}"))
}

fn strip_location(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| !LOCATION_FILLERS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
