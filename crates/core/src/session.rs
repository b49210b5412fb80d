//! Per-visitor conversation state. The hosting layer hands the state machine
//! an opaque visitor key; everything mutable lives in the visitor's
//! `VisitorSession` and nowhere else.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::order::{ConversationMemory, Order, PendingOrder};

/// Fixed schema for everything persisted per visitor: the append-only order
/// history, the single pending-order slot, and the last-intent memory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitorSession {
    pub orders: Vec<Order>,
    pub pending: Option<PendingOrder>,
    pub memory: ConversationMemory,
}

/// Key-value session storage scoped to one visitor. Implementations keep
/// state for the session lifetime only; requests from the same visitor are
/// serialized by client behavior, not by this interface.
pub trait SessionStore: Send + Sync {
    fn load(&self, visitor_id: &str) -> VisitorSession;
    fn save(&self, visitor_id: &str, session: VisitorSession);
}

/// Process-memory store. State disappears on restart, matching the
/// session-lifetime persistence contract.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, VisitorSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, visitor_id: &str) -> VisitorSession {
        let sessions = self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.get(visitor_id).cloned().unwrap_or_default()
    }

    fn save(&self, visitor_id: &str, session: VisitorSession) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.insert(visitor_id.to_string(), session);
    }
}
