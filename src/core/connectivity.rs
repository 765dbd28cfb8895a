use std::fmt;

/// What changed when a new online/offline signal arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    CameOnline,
    WentOffline,
    Unchanged,
}

/// Snapshot for the status line. Display only, never used to gate capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityStatus {
    pub online: bool,
    pub pending: usize,
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.online, self.pending) {
            (true, 0) => write!(f, "Online"),
            (true, n) => write!(f, "Syncing ({n} pending)"),
            (false, n) => write!(f, "Offline ({n} pending)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConnectivityMonitor {
    online: bool,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        Self { online }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Record a new signal from the host.
    pub fn observe(&mut self, online: bool) -> Transition {
        let before = std::mem::replace(&mut self.online, online);
        match (before, online) {
            (false, true) => Transition::CameOnline,
            (true, false) => Transition::WentOffline,
            _ => Transition::Unchanged,
        }
    }

    /// Whether a transition should kick off a drain pass.
    pub fn should_drain(transition: Transition, pending: usize) -> bool {
        transition == Transition::CameOnline && pending > 0
    }

    pub fn status(&self, pending: usize) -> ConnectivityStatus {
        ConnectivityStatus {
            online: self.online,
            pending,
        }
    }
}
