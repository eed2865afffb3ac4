pub mod classifier;
pub mod debounce;

use indexmap::IndexMap;
use log::debug;

use debounce::GestureDebouncer;

/// Per-provider pipeline state: one debouncer per capture session, plus the
/// "busy" flag that keeps a new frame from being classified while a previous
/// frame's event is still being dispatched.
pub struct GestureSession {
    pub debouncer: GestureDebouncer,
    pub busy: bool,
}

impl GestureSession {
    pub fn new() -> GestureSession {
        GestureSession {
            debouncer: GestureDebouncer::new(),
            busy: false,
        }
    }
}

pub struct Systems {
    pub sessions: IndexMap<String, GestureSession>,
}

impl Systems {
    pub fn new() -> Systems {
        Systems {
            sessions: IndexMap::new(),
        }
    }

    /// Get the session for this provider, creating one on first contact
    pub fn session_mut(&mut self, serial: &str) -> &mut GestureSession {
        self.sessions
            .entry(String::from(serial))
            .or_insert_with(|| {
                debug!("New gesture session for provider {}", serial);
                GestureSession::new()
            })
    }
}

impl Default for GestureSession {
    fn default() -> Self {
        GestureSession::new()
    }
}

impl Default for Systems {
    fn default() -> Self {
        Systems::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_created_once_per_provider() {
        let mut systems = Systems::new();
        systems.session_mut("cam-01").busy = true;
        assert_eq!(systems.sessions.len(), 1);

        // Same serial returns the same session, state intact
        assert!(systems.session_mut("cam-01").busy);
        systems.session_mut("remote");
        assert_eq!(systems.sessions.len(), 2);
        assert!(!systems.session_mut("remote").busy);
    }
}
