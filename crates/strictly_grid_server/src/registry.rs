//! Game engines keyed by session id.

use crate::config::EngineMode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_grid::{BoardSize, GameEngine};
use tracing::{debug, info, instrument};

/// Key under which a game engine is stored.
pub type SessionId = String;

/// Key used by every connection in [`EngineMode::Shared`].
pub const SHARED_SESSION: &str = "shared";

impl EngineMode {
    /// Registry key for the connection `connection_id`.
    pub fn session_key(self, connection_id: &str) -> SessionId {
        match self {
            EngineMode::PerConnection => connection_id.to_string(),
            EngineMode::Shared => SHARED_SESSION.to_string(),
        }
    }
}

/// Owns every live game engine.
///
/// Engines are created on first use. Every engine call runs with the
/// registry lock held, so sessions sharing a game never interleave
/// `configure`/`apply_move`.
#[derive(Debug, Clone)]
pub struct SessionManager {
    engines: Arc<Mutex<HashMap<SessionId, GameEngine>>>,
    fallback_size: BoardSize,
}

impl SessionManager {
    /// Creates an empty registry; new engines use `fallback_size` until configured.
    #[instrument]
    pub fn new(fallback_size: BoardSize) -> Self {
        info!("Creating session manager");
        Self {
            engines: Arc::new(Mutex::new(HashMap::new())),
            fallback_size,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, GameEngine>> {
        // Engine operations validate before mutating, so a poisoned map is still consistent.
        self.engines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the engine for `id`, creating it if needed.
    pub fn with_engine<T>(&self, id: &str, f: impl FnOnce(&mut GameEngine) -> T) -> T {
        let mut engines = self.lock();
        let engine = engines.entry(id.to_string()).or_insert_with(|| {
            debug!(session_id = id, "Creating engine");
            GameEngine::with_fallback_size(self.fallback_size)
        });
        f(engine)
    }

    /// Copy of the engine for `id`, if one exists.
    pub fn snapshot(&self, id: &str) -> Option<GameEngine> {
        self.lock().get(id).cloned()
    }

    /// Drops the engine for `id`.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> Option<GameEngine> {
        let removed = self.lock().remove(id);
        if removed.is_some() {
            debug!("Engine removed");
        }
        removed
    }

    /// Ids of all live engines.
    pub fn list_sessions(&self) -> Vec<SessionId> {
        self.lock().keys().cloned().collect()
    }

    /// Number of live engines.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no engine is live.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(BoardSize::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_grid::Mark;

    #[test]
    fn test_engine_created_on_first_use() {
        let registry = SessionManager::default();
        assert!(registry.is_empty());
        let mark = registry.with_engine("a", |engine| engine.apply_move(0, 0).unwrap().placed.mark);
        assert_eq!(mark, Mark::X);
        assert_eq!(registry.list_sessions(), vec!["a".to_string()]);
    }

    #[test]
    fn test_engines_are_independent() {
        let registry = SessionManager::default();
        registry.with_engine("a", |engine| engine.apply_move(0, 0).unwrap());
        let mark = registry.with_engine("b", |engine| engine.apply_move(0, 0).unwrap().placed.mark);
        assert_eq!(mark, Mark::X);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove() {
        let registry = SessionManager::default();
        registry.with_engine("a", |_| ());
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.snapshot("a").is_none());
    }

    #[test]
    fn test_fallback_size_applies_to_new_engines() {
        let registry = SessionManager::new(BoardSize::new(5).unwrap());
        registry.with_engine("a", |engine| engine.apply_move(4, 4).unwrap());
        assert_eq!(registry.snapshot("a").unwrap().board_size().get(), 5);
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(EngineMode::PerConnection.session_key("conn-7"), "conn-7");
        assert_eq!(EngineMode::Shared.session_key("conn-7"), SHARED_SESSION);
    }
}
