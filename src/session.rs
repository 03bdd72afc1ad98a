use std::time::Duration;

use tokio::time::Instant;

/// Marks an input node whose prompt has been shown and whose next submission
/// belongs to its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitingInput {
    pub menu_id: String,
    pub item_id: String,
}

/// Per-session navigation state. Owned by exactly one session.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Node ids from the root to the displayed menu; empty means the root.
    pub path: Vec<String>,
    pub awaiting_input: Option<AwaitingInput>,
    /// Set once the session has ended; later calls see it as expired.
    pub terminated: bool,
    last_seen: Instant,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            path: Vec::new(),
            awaiting_input: None,
            terminated: false,
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn is_idle(&self, idle_timeout: Duration) -> bool {
        self.last_seen.elapsed() >= idle_timeout
    }

    pub fn at_root(&self) -> bool {
        self.path.is_empty()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn idleness_follows_last_touch() {
        let mut state = SessionState::new();
        assert!(state.at_root());
        assert!(!state.is_idle(Duration::from_secs(60)));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(state.is_idle(Duration::from_secs(60)));

        state.touch();
        assert!(!state.is_idle(Duration::from_secs(60)));
    }
}
