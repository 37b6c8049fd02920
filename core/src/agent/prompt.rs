use crate::agent::registry::ToolRegistry;
use std::fmt::Write;

/// Build the fixed system instruction that teaches the model the decision
/// protocol: plan, act on a declared tool, read the observation, and finish
/// with a single `output` message.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a weather assistant that works in PLAN, ACTION, Observation and Output states.\n",
    );
    prompt.push_str("Wait for the user prompt and first PLAN using the available tools.\n");
    prompt.push_str(
        "After planning, take the ACTION with the appropriate tool and wait for the Observation.\n",
    );
    prompt.push_str(
        "Once you have the observations you need, return the final answer as an output message.\n\n",
    );
    prompt.push_str(
        "Reply with exactly one JSON object per turn, using only these shapes:\n",
    );
    prompt.push_str("{\"type\":\"plan\",\"plan\":\"<what you will do next>\"}\n");
    prompt.push_str("{\"type\":\"action\",\"function\":\"<tool name>\",\"input\":\"<argument>\"}\n");
    prompt.push_str("{\"type\":\"output\",\"output\":\"<final answer>\"}\n");

    if !tools.is_empty() {
        prompt.push_str("\nAvailable Tools:\n");
        for (name, description) in tools.descriptions() {
            let _ = writeln!(prompt, "- function {}(city: string): string\n  {}", name, description);
        }
    }

    prompt.push_str("\nExample:\n");
    prompt.push_str("START\n");
    prompt.push_str(
        "{\"type\":\"user\",\"user\":\"What is the sum of weather of Varanasi and Gurugram today?\"}\n",
    );
    prompt.push_str(
        "{\"type\":\"plan\",\"plan\":\"I will call get_current_weather for Varanasi\"}\n",
    );
    prompt.push_str(
        "{\"type\":\"action\",\"function\":\"get_current_weather\",\"input\":\"Varanasi\"}\n",
    );
    prompt.push_str("{\"type\":\"observation\",\"observation\":\"17°C\"}\n");
    prompt.push_str(
        "{\"type\":\"plan\",\"plan\":\"I will call get_current_weather for Gurugram\"}\n",
    );
    prompt.push_str(
        "{\"type\":\"action\",\"function\":\"get_current_weather\",\"input\":\"Gurugram\"}\n",
    );
    prompt.push_str("{\"type\":\"observation\",\"observation\":\"10°C\"}\n");
    prompt.push_str(
        "{\"type\":\"output\",\"output\":\"The sum of weather of Varanasi and Gurugram is 27°C\"}\n",
    );

    prompt
}
