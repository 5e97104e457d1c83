//! JoinRoomHandler - Adds a member to a room.

use std::sync::Arc;

use crate::application::RetryStrategy;
use crate::domain::foundation::{CommandContext, RoomId, UserId};
use crate::domain::room::{JoinedRoom, RoomError, User};
use crate::ports::RoomStore;

use super::call_store;

/// Command to join a room.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRoomCommand {
    pub room_id: RoomId,
    /// Caller; not necessarily the joining user.
    pub user_id: UserId,
    pub user: User,
}

/// Handler for joining rooms.
pub struct JoinRoomHandler {
    store: Arc<dyn RoomStore>,
    retry: RetryStrategy,
}

impl JoinRoomHandler {
    pub fn new(store: Arc<dyn RoomStore>, retry: RetryStrategy) -> Self {
        Self { store, retry }
    }

    pub async fn handle(
        &self,
        cmd: JoinRoomCommand,
        ctx: &CommandContext,
    ) -> Result<JoinedRoom, RoomError> {
        call_store(&self.retry, ctx, "join room", || {
            self.store.join_room(&cmd.room_id, cmd.user.clone())
        })
        .await?;

        tracing::debug!(room_id = %cmd.room_id, member = %cmd.user.id, "User joined room");

        Ok(JoinedRoom {
            room_id: cmd.room_id,
            user: cmd.user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::room::testing::MockRoomStore;
    use crate::domain::foundation::UserName;
    use crate::domain::room::RoomStoreError;
    use std::collections::HashMap;
    use std::time::Duration;

    fn handler(store: Arc<MockRoomStore>) -> JoinRoomHandler {
        JoinRoomHandler::new(store, RetryStrategy::new(3, Duration::ZERO, 1.0))
    }

    fn bob() -> User {
        User::new(
            UserId::new("u2").unwrap(),
            UserName::new("Bob").unwrap(),
            HashMap::from([("color".to_string(), "blue".to_string())]),
        )
    }

    #[tokio::test]
    async fn joined_user_is_echoed_and_stored() {
        let store = Arc::new(MockRoomStore::new());
        let room_id = store.seed_room("u1").await;
        let cmd = JoinRoomCommand {
            room_id,
            user_id: UserId::new("u2").unwrap(),
            user: bob(),
        };

        let joined = handler(store.clone())
            .handle(cmd, &CommandContext::test_fixture())
            .await
            .unwrap();

        assert_eq!(joined.user, bob());
        let snapshot = store.inner().snapshot(&room_id).await.unwrap();
        assert_eq!(snapshot.users, vec![bob()]);
    }

    #[tokio::test]
    async fn joining_missing_room_fails() {
        let store = Arc::new(MockRoomStore::new());
        let room_id = RoomId::new();
        let cmd = JoinRoomCommand {
            room_id,
            user_id: UserId::new("u2").unwrap(),
            user: bob(),
        };

        let result = handler(store).handle(cmd, &CommandContext::test_fixture()).await;

        assert_eq!(
            result,
            Err(RoomError::store("join room", RoomStoreError::RoomNotFound(room_id)))
        );
    }
}
