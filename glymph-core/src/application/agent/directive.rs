use super::errors::AgentError;
use serde_json::Value;

/// What the model asked for in one turn of the tool loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDirective {
    Final { response: String },
    CallTool { tool: String, input: String },
}

/// Parse a model reply of the form `{"action":"final","response":..}` or
/// `{"action":"call_tool","tool":..,"input":..}`. Code fences and prose around
/// the object are tolerated.
pub fn parse_directive(content: &str) -> Result<AgentDirective, AgentError> {
    let value = extract_json(content).ok_or_else(|| {
        AgentError::InvalidResponse("expected JSON object in agent response".into())
    })?;
    directive_from_value(value)
}

fn directive_from_value(value: Value) -> Result<AgentDirective, AgentError> {
    let map = match value {
        Value::Object(map) => map,
        Value::String(text) => return parse_directive(&text),
        other => {
            return Err(AgentError::InvalidResponse(format!(
                "unsupported response type: {other}"
            )));
        }
    };

    let action = map.get("action").and_then(Value::as_str).ok_or_else(|| {
        AgentError::InvalidResponse("missing action field in agent response".into())
    })?;

    match action {
        "call_tool" => {
            let tool = map.get("tool").and_then(Value::as_str).ok_or_else(|| {
                AgentError::InvalidResponse("call_tool action missing tool field".into())
            })?;
            Ok(AgentDirective::CallTool {
                tool: tool.to_string(),
                input: input_text(map.get("input")),
            })
        }
        "final" => {
            let response = map.get("response").and_then(Value::as_str).ok_or_else(|| {
                AgentError::InvalidResponse("final action missing response field".into())
            })?;
            Ok(AgentDirective::Final {
                response: response.to_string(),
            })
        }
        other => Err(AgentError::InvalidResponse(format!(
            "unknown action value: {other}"
        ))),
    }
}

// Tools take free text; structured input is forwarded as its JSON text.
fn input_text(input: Option<&Value>) -> String {
    match input {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn extract_json(content: &str) -> Option<Value> {
    let trimmed = content.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if trimmed.starts_with("```") {
        let stripped = trimmed
            .trim_start_matches("```json")
            .trim_start_matches("```JSON")
            .trim_start_matches("```");
        if let Some(end) = stripped.rfind("```") {
            if let Ok(value) = serde_json::from_str::<Value>(stripped[..end].trim()) {
                return Some(value);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start < end {
        serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
    } else {
        None
    }
}
