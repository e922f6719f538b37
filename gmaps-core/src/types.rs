use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        name: String,
        args: serde_json::Value,
    },
    FunctionResponse {
        name: String,
        response: serde_json::Value,
    },
}

impl Content {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into(), parts: Vec::new() }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text { text: text.into() });
        self
    }

    pub fn with_function_call(mut self, name: impl Into<String>, args: serde_json::Value) -> Self {
        self.parts.push(Part::FunctionCall { name: name.into(), args });
        self
    }

    pub fn with_function_response(
        mut self,
        name: impl Into<String>,
        response: serde_json::Value,
    ) -> Self {
        self.parts.push(Part::FunctionResponse { name: name.into(), response });
        self
    }

    /// Concatenates every text part, ignoring function calls and responses.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::text).collect()
    }

    pub fn function_calls(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.parts.iter().filter_map(|p| match p {
            Part::FunctionCall { name, args } => Some((name.as_str(), args)),
            _ => None,
        })
    }
}

impl Part {
    /// Returns the text content if this is a Text part, None otherwise
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }
}
