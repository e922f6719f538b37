use async_trait::async_trait;
use gmaps_core::{Content, InvocationContext, ReadonlyContext, SharedState};

pub struct TestContext {
    content: Content,
    state: SharedState,
}

impl TestContext {
    pub fn new(message: &str) -> Self {
        Self { content: Content::new("user").with_text(message), state: SharedState::default() }
    }
}

#[async_trait]
impl ReadonlyContext for TestContext {
    fn invocation_id(&self) -> &str {
        "test-inv"
    }
    fn user_id(&self) -> &str {
        "test-user"
    }
    fn session_id(&self) -> &str {
        "test-session"
    }
    fn user_content(&self) -> &Content {
        &self.content
    }
}

#[async_trait]
impl InvocationContext for TestContext {
    fn state(&self) -> &SharedState {
        &self.state
    }
}
