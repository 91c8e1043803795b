use std::collections::{BTreeSet, HashMap};

/// Background-mute paths and locked pids.
///
/// Pure bookkeeping: nothing here talks to a gateway. Owned by the
/// controller and handed to each engine call.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    background_mute_paths: BTreeSet<String>,
    /// pid -> mute state captured when the lock was taken
    locked: HashMap<u32, bool>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            background_mute_paths: paths.into_iter().map(Into::into).collect(),
            locked: HashMap::new(),
        }
    }

    /// Returns whether the path is registered after the toggle.
    pub fn toggle_background_mute(&mut self, path: &str) -> bool {
        if self.background_mute_paths.remove(path) {
            false
        } else {
            self.background_mute_paths.insert(path.to_string());
            true
        }
    }

    pub fn is_background_muted(&self, path: &str) -> bool {
        self.background_mute_paths.contains(path)
    }

    pub fn background_mute_paths(&self) -> impl Iterator<Item = &str> {
        self.background_mute_paths.iter().map(String::as_str)
    }

    /// Returns whether the pid is locked after the toggle.
    pub fn toggle_lock(&mut self, pid: u32, current_muted: bool) -> bool {
        if self.locked.remove(&pid).is_some() {
            false
        } else {
            self.locked.insert(pid, current_muted);
            true
        }
    }

    pub fn is_locked(&self, pid: u32) -> bool {
        self.locked.contains_key(&pid)
    }

    pub fn locked_mute_state(&self, pid: u32) -> Option<bool> {
        self.locked.get(&pid).copied()
    }
}
