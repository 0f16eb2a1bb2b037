//! Browser location with history semantics.

/// Current path plus the history stack behind it.
///
/// `push` is a user-visible navigation; `replace` rewrites the current
/// entry in place and is what redirects use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    entries: Vec<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location {
    /// A location with a single entry.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            entries: vec![path.into()],
        }
    }

    /// The current path.
    pub fn path(&self) -> &str {
        // entries is never empty: every constructor seeds one
        self.entries.last().map(String::as_str).unwrap_or("/")
    }

    /// Navigate to `path`, adding a history entry.
    pub fn push(&mut self, path: impl Into<String>) {
        self.entries.push(path.into());
    }

    /// Rewrite the current entry without adding history.
    pub fn replace(&mut self, path: impl Into<String>) {
        let path = path.into();
        match self.entries.last_mut() {
            Some(last) => *last = path,
            None => self.entries.push(path),
        }
    }

    /// Number of history entries.
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}
