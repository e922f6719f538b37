use async_trait::async_trait;
use gmaps_core::{Result, Tool, ToolContext};
use gmaps_telemetry::{Instrument, tool_execute_span};
use schemars::JsonSchema;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type AsyncHandler = Box<
    dyn Fn(Arc<dyn ToolContext>, Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        + Send
        + Sync,
>;

pub struct FunctionTool {
    name: String,
    description: String,
    handler: AsyncHandler,
    parameters_schema: Option<Value>,
}

impl FunctionTool {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<dyn ToolContext>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Box::new(move |ctx, args| Box::pin(handler(ctx, args))),
            parameters_schema: None,
        }
    }

    /// Declares the arguments with the JSON schema of `T`.
    pub fn with_parameters_schema<T: JsonSchema>(mut self) -> Self {
        let schema = schemars::schema_for!(T);
        self.parameters_schema = serde_json::to_value(schema).ok().map(function_declaration_schema);
        self
    }
}

/// Reduces a generated schema to the OpenAPI subset accepted in function
/// declarations: no root metadata, and `["T", "null"]` types become
/// `T` with `nullable`.
fn function_declaration_schema(mut schema: Value) -> Value {
    if let Value::Object(map) = &mut schema {
        map.remove("$schema");
        map.remove("title");
        map.remove("definitions");
    }
    collapse_nullable(&mut schema);
    schema
}

fn collapse_nullable(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            let collapsed = match map.get("type") {
                Some(Value::Array(types)) => {
                    let mut non_null = types.iter().filter(|t| t.as_str() != Some("null"));
                    match (non_null.next(), non_null.next()) {
                        (Some(only), None) if types.len() > 1 => Some(only.clone()),
                        _ => None,
                    }
                }
                _ => None,
            };
            if let Some(only) = collapsed {
                map.insert("type".to_string(), only);
                map.insert("nullable".to_string(), Value::Bool(true));
            }
            map.values_mut().for_each(collapse_nullable);
        }
        Value::Array(items) => items.iter_mut().for_each(collapse_nullable),
        _ => {}
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Option<Value> {
        self.parameters_schema.clone()
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let span = tool_execute_span(&self.name, ctx.function_call_id());
        (self.handler)(ctx, args).instrument(span).await
    }
}
