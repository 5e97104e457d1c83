//! CommandCache port - Interface for command-id deduplication storage.
//!
//! Entries expire after an implementation-chosen TTL. Keys live under an
//! implementation-chosen namespace.

use async_trait::async_trait;

use crate::domain::foundation::CommandId;
use crate::domain::room::CacheError;

/// Port for remembering recently executed command ids.
///
/// # Example
///
/// ```ignore
/// let owner = ctx.request_id().to_string();
/// if !cache.save_if_absent(&command_id, &owner).await? {
///     return Ok(()); // Duplicate, skip
/// }
///
/// // Execute command...
///
/// cache.save(&command_id, &owner).await?; // Refresh TTL
/// ```
#[async_trait]
pub trait CommandCache: Send + Sync {
    /// Whether `id` was recorded and has not yet expired.
    async fn exists(&self, id: &CommandId) -> Result<bool, CacheError>;

    /// Record `id` for `owner`, resetting its TTL.
    async fn save(&self, id: &CommandId, owner: &str) -> Result<(), CacheError>;

    /// Atomically record `id` for `owner` unless another owner holds it.
    ///
    /// Returns `true` if `id` was absent or is already held by `owner`,
    /// `false` if a different owner holds it. Repeating a call whose reply
    /// was lost therefore gives the same answer. Concurrent callers with
    /// distinct owners see exactly one `true`.
    async fn save_if_absent(&self, id: &CommandId, owner: &str) -> Result<bool, CacheError>;
}
