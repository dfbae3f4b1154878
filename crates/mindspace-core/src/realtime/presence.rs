//! Presence registry: which users are reachable right now, and through
//! which connection.
//!
//! One mutex guards both directions of the mapping so every operation is
//! atomic with respect to the others. The lock is only ever held for the
//! in-memory map work itself; callers await I/O strictly outside.

use std::collections::HashMap;
use std::sync::Mutex;

use mindspace_types::event::ServerEvent;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Handle to one live, authenticated connection.
///
/// The id is server-assigned and unique for the connection's lifetime; the
/// sender feeds the connection's outbound queue, so delivery to a slow
/// client never blocks the router.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(id: Uuid, sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queue an event for this connection. Returns `false` if the
    /// connection task already dropped its receiver (tear-down in
    /// progress); the caller treats that the same as "offline".
    pub fn send(&self, event: ServerEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

#[derive(Default)]
struct Maps {
    by_user: HashMap<i64, ConnectionHandle>,
    by_handle: HashMap<Uuid, i64>,
}

/// Bidirectional user-id <-> connection-handle registry.
///
/// Invariant: at most one handle per user (a later login supersedes the
/// earlier one), and `by_handle` holds exactly the handles present in
/// `by_user`.
#[derive(Default)]
pub struct PresenceRegistry {
    maps: Mutex<Maps>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a user to a connection handle, superseding any previous handle
    /// for the same user. The superseded connection is not closed here;
    /// its transport-level disconnect arrives on its own and becomes a
    /// no-op in [`unregister`](Self::unregister).
    pub fn register(&self, user_id: i64, handle: ConnectionHandle) {
        let mut maps = self.maps.lock().expect("presence lock poisoned");
        let handle_id = handle.id();
        if let Some(old) = maps.by_user.insert(user_id, handle) {
            maps.by_handle.remove(&old.id());
        }
        maps.by_handle.insert(handle_id, user_id);
    }

    /// Remove the entry whose current handle is `handle_id`.
    ///
    /// Matching is strictly by handle, never by user id: if the user
    /// already reconnected elsewhere, the stale disconnect must not wipe
    /// the fresh registration. No-op when the handle is unknown (already
    /// superseded, or the connection never finished authenticating).
    pub fn unregister(&self, handle_id: Uuid) {
        let mut maps = self.maps.lock().expect("presence lock poisoned");
        if let Some(user_id) = maps.by_handle.remove(&handle_id) {
            maps.by_user.remove(&user_id);
        }
    }

    /// Current handle for a user, if they are online.
    pub fn lookup(&self, user_id: i64) -> Option<ConnectionHandle> {
        let maps = self.maps.lock().expect("presence lock poisoned");
        maps.by_user.get(&user_id).cloned()
    }

    /// Reverse lookup: which user owns this connection handle.
    pub fn find_identity(&self, handle_id: Uuid) -> Option<i64> {
        let maps = self.maps.lock().expect("presence lock poisoned");
        maps.by_handle.get(&handle_id).copied()
    }

    /// Reverse lookup returning the handle itself alongside the user id.
    ///
    /// The clone lets a caller keep addressing the connection a request
    /// arrived on even if the user re-registers elsewhere before the
    /// caller finishes (the registry would then only know the new handle).
    pub fn find_connection(&self, handle_id: Uuid) -> Option<(i64, ConnectionHandle)> {
        let maps = self.maps.lock().expect("presence lock poisoned");
        let user_id = *maps.by_handle.get(&handle_id)?;
        let handle = maps.by_user.get(&user_id)?.clone();
        Some((user_id, handle))
    }

    /// Number of users currently online.
    pub fn online_count(&self) -> usize {
        let maps = self.maps.lock().expect("presence lock poisoned");
        maps.by_user.len()
    }
}
