//! Who is acting, and when. Supplied by the hosting process to anything
//! that stamps rows or writes audit entries.

use chrono::Utc;

use crate::types::{DbId, Timestamp};

pub trait ActorContext {
    fn actor_id(&self) -> DbId;
    fn now(&self) -> Timestamp;
}

/// A fixed actor and instant. Request handlers build one per request;
/// tests pin the instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub at: Timestamp,
}

impl Actor {
    /// Acting now.
    pub fn new(user_id: DbId) -> Self {
        Self {
            user_id,
            at: Utc::now(),
        }
    }

    pub fn at(user_id: DbId, at: Timestamp) -> Self {
        Self { user_id, at }
    }
}

impl ActorContext for Actor {
    fn actor_id(&self) -> DbId {
        self.user_id
    }

    fn now(&self) -> Timestamp {
        self.at
    }
}
