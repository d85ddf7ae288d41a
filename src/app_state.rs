// =============================================================================
// Central Application State: Trendcast service
// =============================================================================
//
// Shared across all request handlers via `Arc<AppState>`.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the config and the session map. Every session
//     operation runs under the map's write lock, so rounds of one session are
//     always resolved one after another.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::game::{GameError, Session, SessionSnapshot};
use crate::runtime_config::GameConfig;

/// Central application state shared across all handlers via `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, bumped on every session
    /// mutation.
    pub state_version: AtomicU64,

    pub runtime_config: Arc<RwLock<GameConfig>>,

    pub sessions: RwLock<HashMap<String, Session>>,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            runtime_config: Arc::new(RwLock::new(config)),
            sessions: RwLock::new(HashMap::new()),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn increment_version(&self) {
        self.state_version.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Open a fresh session, evicting the oldest ones beyond `max_sessions`.
    pub fn create_session(&self) -> SessionSnapshot {
        let max_sessions = self.runtime_config.read().max_sessions.max(1);
        let session = Session::new();
        let snapshot = session.snapshot();

        let mut sessions = self.sessions.write();
        while sessions.len() >= max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.created_at)
                .map(|s| s.id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    info!(session_id = %id, "evicted oldest session");
                }
                None => break,
            }
        }
        sessions.insert(session.id.clone(), session);
        drop(sessions);

        self.increment_version();
        info!(session_id = %snapshot.session_id, "session created");
        snapshot
    }

    pub fn session_snapshot(&self, id: &str) -> Result<SessionSnapshot, GameError> {
        self.sessions
            .read()
            .get(id)
            .map(Session::snapshot)
            .ok_or_else(|| GameError::SessionNotFound(id.to_string()))
    }

    /// Run `f` against session `id` under the write lock.
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<R, GameError>,
    ) -> Result<R, GameError> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| GameError::SessionNotFound(id.to_string()))?;
        let result = f(session)?;
        drop(sessions);

        self.increment_version();
        Ok(result)
    }
}
