// CarePlus Engine — Auth & Routing Seams
// Registration hands the finished payload to an external auth service and,
// on success, asks the front-end's router to move to the role dashboard.
// Both collaborators are traits so the embedding front-end owns transport
// and navigation; the engine only sequences them.

use async_trait::async_trait;

use crate::atoms::error::EngineResult;
use crate::atoms::types::UserData;

/// External registration collaborator (the auth service).
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create the account for `user`. `Ok(true)` means the account exists
    /// when the call returns; `Ok(false)` means the service declined.
    /// Transport-level failures map to `Err`.
    async fn register(&self, user: UserData) -> EngineResult<bool>;
}

/// Route-change seam (`router.push` in a web front-end).
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}
