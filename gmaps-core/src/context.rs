use crate::{SharedState, types::Content};
use async_trait::async_trait;

#[async_trait]
pub trait ReadonlyContext: Send + Sync {
    fn invocation_id(&self) -> &str;
    fn user_id(&self) -> &str;
    fn session_id(&self) -> &str;
    fn user_content(&self) -> &Content;
}

/// Per-turn context handed to every agent of the tree. All agents of one turn
/// see the same [`SharedState`].
#[async_trait]
pub trait InvocationContext: ReadonlyContext {
    fn state(&self) -> &SharedState;
}
