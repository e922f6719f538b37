use gmaps_core::{
    Content, InvocationContext as InvocationContextTrait, ReadonlyContext, SharedState,
};
use async_trait::async_trait;
use std::sync::Arc;

pub struct InvocationContext {
    invocation_id: String,
    user_id: String,
    session_id: String,
    user_content: Content,
    state: Arc<SharedState>,
}

impl InvocationContext {
    pub fn new(
        invocation_id: String,
        user_id: String,
        session_id: String,
        user_content: Content,
        state: Arc<SharedState>,
    ) -> Self {
        Self { invocation_id, user_id, session_id, user_content, state }
    }
}

#[async_trait]
impl ReadonlyContext for InvocationContext {
    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn user_content(&self) -> &Content {
        &self.user_content
    }
}

#[async_trait]
impl InvocationContextTrait for InvocationContext {
    fn state(&self) -> &SharedState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmaps_core::OutputKey;

    #[test]
    fn test_context_shares_state() {
        let state = Arc::new(SharedState::default());
        let ctx = InvocationContext::new(
            "inv-1".to_string(),
            "user".to_string(),
            "session".to_string(),
            Content::new("user").with_text("hello"),
            state.clone(),
        );
        ctx.state().write(|s| s.set_output(OutputKey::Types, "cafe")).unwrap();

        assert_eq!(ctx.invocation_id(), "inv-1");
        assert_eq!(ctx.user_content().text(), "hello");
        assert_eq!(state.read(|s| s.output(OutputKey::Types).map(str::to_string)).as_deref(), Some("cafe"));
    }
}
