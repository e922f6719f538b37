//! Wire types and conversions for the Gemini REST API.

use gmaps_core::{
    Content, FinishReason, GenerateContentConfig, LlmRequest, LlmResponse, Part, UsageMetadata,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

/// One part of a content. Gemini sends exactly one payload field per part,
/// alongside optional metadata such as `thoughtSignature`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<WireFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<WireFunctionResponse>,
    /// Set on reasoning summaries, which are not part of the answer.
    #[serde(default, skip_serializing)]
    pub thought: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTool {
    pub function_declarations: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<WireUsage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<WireContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUsage {
    #[serde(default)]
    pub prompt_token_count: i32,
    #[serde(default)]
    pub candidates_token_count: i32,
    #[serde(default)]
    pub total_token_count: i32,
}

/// Gemini only knows `user` and `model`; function responses travel as `user`.
fn wire_role(role: &str) -> &'static str {
    match role {
        "model" | "assistant" => "model",
        _ => "user",
    }
}

fn part_to_wire(part: &Part) -> WirePart {
    match part {
        Part::Text { text } => WirePart { text: Some(text.clone()), ..Default::default() },
        Part::FunctionCall { name, args } => WirePart {
            function_call: Some(WireFunctionCall { name: name.clone(), args: args.clone() }),
            ..Default::default()
        },
        Part::FunctionResponse { name, response } => WirePart {
            function_response: Some(WireFunctionResponse {
                name: name.clone(),
                response: response.clone(),
            }),
            ..Default::default()
        },
    }
}

pub fn content_to_wire(content: &Content) -> WireContent {
    WireContent {
        role: Some(wire_role(&content.role).to_string()),
        parts: content.parts.iter().map(part_to_wire).collect(),
    }
}

fn config_to_wire(config: &GenerateContentConfig) -> GenerationConfig {
    GenerationConfig {
        temperature: config.temperature,
        top_p: config.top_p,
        top_k: config.top_k,
        max_output_tokens: config.max_output_tokens,
        response_mime_type: config.response_schema.as_ref().map(|_| "application/json".to_string()),
        response_schema: config.response_schema.clone(),
    }
}

pub fn build_request(request: &LlmRequest) -> GenerateContentRequest {
    let mut declarations: Vec<(&String, &Value)> = request.tools.iter().collect();
    declarations.sort_by(|a, b| a.0.cmp(b.0));
    let tools = if declarations.is_empty() {
        Vec::new()
    } else {
        vec![WireTool {
            function_declarations: declarations.into_iter().map(|(_, d)| d.clone()).collect(),
        }]
    };

    GenerateContentRequest {
        contents: request.contents.iter().map(content_to_wire).collect(),
        system_instruction: request
            .system_instruction
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| WireContent {
                role: None,
                parts: vec![WirePart { text: Some(s.clone()), ..Default::default() }],
            }),
        tools,
        generation_config: request.config.as_ref().map(config_to_wire),
    }
}

fn finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        "RECITATION" => FinishReason::Recitation,
        _ => FinishReason::Other,
    }
}

/// Converts the first candidate. Thought parts and payloads other than text
/// and function calls are dropped.
pub fn response_from_wire(response: GenerateContentResponse) -> LlmResponse {
    let candidate = response.candidates.into_iter().next();
    let content = candidate.as_ref().and_then(|c| c.content.as_ref()).map(|wire| {
        let mut content = Content::new(wire.role.clone().unwrap_or_else(|| "model".to_string()));
        for part in wire.parts.iter().filter(|p| p.thought != Some(true)) {
            if let Some(text) = &part.text {
                content.parts.push(Part::Text { text: text.clone() });
            }
            if let Some(call) = &part.function_call {
                content.parts.push(Part::FunctionCall {
                    name: call.name.clone(),
                    args: call.args.clone(),
                });
            }
        }
        content
    });

    LlmResponse {
        content,
        usage_metadata: response.usage_metadata.map(|u| UsageMetadata {
            prompt_token_count: u.prompt_token_count,
            candidates_token_count: u.candidates_token_count,
            total_token_count: u.total_token_count,
        }),
        finish_reason: candidate.and_then(|c| c.finish_reason).map(|r| finish_reason(&r)),
        partial: false,
        turn_complete: true,
    }
}
