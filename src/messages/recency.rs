/// Recency tracker: bounded history of recently announced raw templates.
///
/// Shared by every pool: a template used for a death is also down-weighted if
/// it ever shows up in another pool. The history lives for the process
/// lifetime and is never persisted.
///
/// The selector holds the guard returned by `lock()` across predicate
/// evaluation, the draw and the push, so concurrent announcers cannot
/// interleave a repetition check with another announcer's update.
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug)]
pub struct RecencyTracker {
    history: Mutex<RecentHistory>,
}

/// Most-recent-first ring of raw template texts.
#[derive(Debug, Clone)]
pub struct RecentHistory {
    texts:    VecDeque<String>,
    capacity: usize,
}

impl RecentHistory {
    fn new(capacity: usize) -> Self {
        Self { texts: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t == text)
    }

    pub fn push(&mut self, text: &str) {
        if self.capacity == 0 {
            return;
        }
        self.texts.push_front(text.to_owned());
        self.texts.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn clear(&mut self) {
        self.texts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(String::as_str)
    }
}

impl RecencyTracker {
    pub fn new(capacity: usize) -> Self {
        Self { history: Mutex::new(RecentHistory::new(capacity)) }
    }

    /// Enter the critical section. A poisoned lock still holds a valid list of
    /// strings, so it is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, RecentHistory> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the history, most recent first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().map(str::to_owned).collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lock().contains(text)
    }

    pub fn push(&self, text: &str) {
        self.lock().push(text);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for RecencyTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
