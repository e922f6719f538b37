use crate::{ReadonlyContext, Result, SharedState};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Option<Value> {
        None
    }
    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value>;
}

#[async_trait]
pub trait ToolContext: ReadonlyContext {
    fn function_call_id(&self) -> &str;
    fn state(&self) -> &SharedState;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Content, OutputKey};

    struct TestTool {
        name: String,
    }

    struct TestContext {
        content: Content,
        state: SharedState,
    }

    impl TestContext {
        fn new() -> Self {
            Self { content: Content::new("user"), state: SharedState::default() }
        }
    }

    #[async_trait]
    impl ReadonlyContext for TestContext {
        fn invocation_id(&self) -> &str {
            "test"
        }
        fn user_id(&self) -> &str {
            "user"
        }
        fn session_id(&self) -> &str {
            "session"
        }
        fn user_content(&self) -> &Content {
            &self.content
        }
    }

    #[async_trait]
    impl ToolContext for TestContext {
        fn function_call_id(&self) -> &str {
            "call-123"
        }
        fn state(&self) -> &SharedState {
            &self.state
        }
    }

    #[async_trait]
    impl Tool for TestTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "test tool"
        }

        async fn execute(&self, ctx: Arc<dyn ToolContext>, _args: Value) -> Result<Value> {
            let language = ctx.state().read(|s| s.output(OutputKey::Language).map(str::to_string));
            Ok(Value::String(language.unwrap_or_default()))
        }
    }

    #[test]
    fn test_tool_trait() {
        let tool = TestTool { name: "test".to_string() };
        assert_eq!(tool.name(), "test");
        assert_eq!(tool.description(), "test tool");
        assert!(tool.parameters_schema().is_none());
    }

    #[tokio::test]
    async fn test_tool_reads_shared_state() {
        let tool = TestTool { name: "test".to_string() };
        let ctx = TestContext::new();
        ctx.state.write(|s| s.set_output(OutputKey::Language, "ko")).unwrap();
        let ctx = Arc::new(ctx) as Arc<dyn ToolContext>;
        let result = tool.execute(ctx, Value::Null).await.unwrap();
        assert_eq!(result, Value::String("ko".to_string()));
    }
}
