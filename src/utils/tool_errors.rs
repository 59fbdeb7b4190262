use crate::errors::ToolError;
use crate::utils::suggest::suggest;

fn did_you_mean(input: &str, known: &[String]) -> Option<String> {
    let suggestions = suggest(input, known, 3);
    if suggestions.is_empty() {
        None
    } else {
        Some(format!("Did you mean: {}?", suggestions.join(", ")))
    }
}

/// Text for a call naming a tool the server does not expose.
pub fn unknown_tool_message(tool: &str, known: &[String]) -> String {
    let mut parts = vec![format!("Unknown tool: {}", tool)];
    if let Some(hint) = did_you_mean(tool, known) {
        parts.push(hint);
    }
    if !known.is_empty() {
        parts.push(format!("Available tools: {}.", known.join(", ")));
    }
    parts.join(" ")
}

/// A manager was handed a tool it does not own.
pub fn unknown_tool_error(group: &str, tool: &str, known_tools: &[&str]) -> ToolError {
    let known: Vec<String> = known_tools.iter().map(|s| s.to_string()).collect();
    let mut message = format!("Unknown {} tool: {}", group, tool);
    if let Some(hint) = did_you_mean(tool, &known) {
        message.push(' ');
        message.push_str(&hint);
    }
    ToolError::invalid_params(message)
}
