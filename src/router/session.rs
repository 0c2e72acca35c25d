// Browser Session Seams
//
// The navigator never touches a real browser. It writes fragments to a
// `ContentSink`, moves through a `History` and stashes small strings in a
// `LocalStore`. The in-memory implementations here back the page server and
// the tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// The single content container fragments are written into.
pub trait ContentSink: Send + Sync {
    fn set_content(&self, html: &str);
}

pub trait History: Send + Sync {
    /// Current location as `path?query`.
    fn location(&self) -> String;
    /// Add a new entry and make it current.
    fn push(&self, url: &str);
    /// Overwrite the current entry.
    fn replace(&self, url: &str);
    /// Leave the application for an external URL.
    fn assign(&self, url: &str);
}

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Keeps the last fragment written.
#[derive(Default)]
pub struct BufferSink {
    content: Mutex<String>,
    writes: Mutex<usize>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> String {
        lock(&self.content).clone()
    }

    /// How many times content was set, loading placeholders included.
    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }
}

impl ContentSink for BufferSink {
    fn set_content(&self, html: &str) {
        *lock(&self.content) = html.to_string();
        *lock(&self.writes) += 1;
    }
}

struct HistoryState {
    entries: Vec<String>,
    index: usize,
    external: Option<String>,
}

/// Back/forward stack with browser semantics: pushing drops forward entries.
pub struct SessionHistory {
    state: Mutex<HistoryState>,
}

impl SessionHistory {
    pub fn starting_at(location: &str) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                entries: vec![location.to_string()],
                index: 0,
                external: None,
            }),
        }
    }

    /// Step back one entry. Returns false at the start of the stack.
    pub fn back(&self) -> bool {
        let mut state = lock(&self.state);
        if state.index == 0 {
            return false;
        }
        state.index -= 1;
        true
    }

    /// Step forward one entry. Returns false at the end of the stack.
    pub fn forward(&self) -> bool {
        let mut state = lock(&self.state);
        if state.index + 1 >= state.entries.len() {
            return false;
        }
        state.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The external URL the page asked to leave for, if any.
    pub fn external_redirect(&self) -> Option<String> {
        lock(&self.state).external.clone()
    }
}

impl History for SessionHistory {
    fn location(&self) -> String {
        let state = lock(&self.state);
        state.entries[state.index].clone()
    }

    fn push(&self, url: &str) {
        let mut state = lock(&self.state);
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(url.to_string());
        state.index = state.entries.len() - 1;
    }

    fn replace(&self, url: &str) {
        let mut state = lock(&self.state);
        let index = state.index;
        state.entries[index] = url.to_string();
    }

    fn assign(&self, url: &str) {
        lock(&self.state).external = Some(url.to_string());
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock(&self.values).remove(key);
    }
}

impl<T: ContentSink + ?Sized> ContentSink for std::sync::Arc<T> {
    fn set_content(&self, html: &str) {
        (**self).set_content(html)
    }
}

impl<T: History + ?Sized> History for std::sync::Arc<T> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn push(&self, url: &str) {
        (**self).push(url)
    }

    fn replace(&self, url: &str) {
        (**self).replace(url)
    }

    fn assign(&self, url: &str) {
        (**self).assign(url)
    }
}

impl<T: LocalStore + ?Sized> LocalStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
