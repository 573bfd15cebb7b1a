//! Breadth-first frontier
//!
//! The frontier is a strict FIFO queue of `(url, depth)` entries. Entries are
//! popped in the order they were enqueued, which makes the traversal
//! level-by-level: every depth-`d` entry is enqueued before any depth-`d + 1`
//! entry discovered from it.

use std::collections::VecDeque;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL
    pub url: String,

    /// Link hops from the nearest seed
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// FIFO queue of frontier entries
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the back of the queue
    pub fn push(&mut self, entry: FrontierEntry) {
        self.queue.push_back(entry);
    }

    /// Appends links discovered on one page, keeping their order
    pub fn extend_links<I>(&mut self, links: I, depth: u32)
    where
        I: IntoIterator<Item = String>,
    {
        self.queue
            .extend(links.into_iter().map(|url| FrontierEntry { url, depth }));
    }

    /// Removes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Returns the number of entries waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
