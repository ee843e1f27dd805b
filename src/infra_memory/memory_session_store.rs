use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Process-local session store. Records live until deleted; nothing expires.
pub struct MemorySessionStore<U: Identity> {
    sessions: DashMap<String, U>,
}

impl<U: Identity> MemorySessionStore<U> {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[inline]
    fn new_token() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl<U: Identity> Default for MemorySessionStore<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<U: Identity> SessionStore<U> for MemorySessionStore<U> {
    async fn create_session(&self, user: U) -> Result<SessionToken, StoreError> {
        loop {
            let token = Self::new_token();
            if let Entry::Vacant(slot) = self.sessions.entry(token.clone()) {
                slot.insert(user);
                return Ok(SessionToken(token));
            }
        }
    }

    async fn user_for_session(&self, token: &SessionToken) -> Result<U, StoreError> {
        self.sessions
            .get(token.as_str())
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::SessionNotFound)
    }

    async fn delete_session(&self, token: &SessionToken) -> Result<(), StoreError> {
        self.sessions
            .remove(token.as_str())
            .map(|_| ())
            .ok_or(StoreError::SessionNotFound)
    }
}
