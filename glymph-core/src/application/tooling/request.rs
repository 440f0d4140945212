use super::error::ToolInvocationError;
use crate::domain::{HttpMethod, InputLocation, ToolConfig};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde_json::{Map, Value};

/// Fully resolved outbound call, ready to hand to an HTTP client.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn insert_header(
    headers: &mut HeaderMap,
    tool: &str,
    name: &str,
    value: &str,
) -> Result<(), ToolInvocationError> {
    let invalid = || ToolInvocationError::InvalidHeader {
        tool: tool.to_string(),
        name: name.to_string(),
    };
    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
    let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
    headers.insert(name, value);
    Ok(())
}

/// Map a tool descriptor and the caller's text onto the request it triggers.
///
/// Static query parameters, headers and body are always sent; the input is
/// then placed according to `input_location`. A tool credential becomes a
/// bearer `Authorization` header unless one is configured explicitly.
pub fn build_request(tool: &ToolConfig, input: &str) -> Result<ToolRequest, ToolInvocationError> {
    let invocation = &tool.config;
    let raw_url = invocation.url.trim();
    if raw_url.is_empty() {
        return Err(ToolInvocationError::NoEndpoint {
            tool: tool.name.clone(),
        });
    }

    let raw_url = match invocation.input_location {
        InputLocation::Url => raw_url.replace(
            &format!("{{{}}}", invocation.input_key),
            &urlencoding::encode(input),
        ),
        _ => raw_url.to_string(),
    };
    let mut url = Url::parse(&raw_url).map_err(|err| ToolInvocationError::InvalidUrl {
        tool: tool.name.clone(),
        url: raw_url.clone(),
        reason: err.to_string(),
    })?;

    let mut query: Vec<(String, String)> = invocation
        .params
        .iter()
        .map(|(key, value)| (key.clone(), query_value(value)))
        .collect();
    if invocation.input_location == InputLocation::Params {
        query.push((invocation.input_key.clone(), input.to_string()));
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    let mut headers = HeaderMap::new();
    for (name, value) in &invocation.headers {
        insert_header(&mut headers, &tool.name, name, value)?;
    }
    if invocation.input_location == InputLocation::Headers {
        insert_header(&mut headers, &tool.name, &invocation.input_key, input)?;
    }
    let credential = tool.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty());
    if let Some(key) = credential {
        if !headers.contains_key(AUTHORIZATION) {
            insert_header(&mut headers, &tool.name, "authorization", &format!("Bearer {key}"))?;
        }
    }

    let body = match invocation.input_location {
        InputLocation::Body => {
            let mut fields = match invocation.body.clone() {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            fields.insert(invocation.input_key.clone(), Value::String(input.to_string()));
            Some(Value::Object(fields))
        }
        _ => invocation.body.clone(),
    };

    Ok(ToolRequest {
        method: method_of(invocation.method),
        url,
        headers,
        body,
    })
}
