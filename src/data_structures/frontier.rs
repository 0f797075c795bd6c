//! Frontiers for uninformed search.
//!
//! Both disciplines share one type so the search loop doesn't need to know
//! which one it's running.

use std::collections::VecDeque;

/// Discovered States waiting to be expanded.
#[derive(Debug)]
pub enum Frontier<St> {
    /// First in, first out. Breadth-first.
    Fifo(VecDeque<St>),
    /// Last in, first out. Depth-first.
    Lifo(Vec<St>),
}

impl<St> Frontier<St> {
    #[must_use]
    pub fn fifo() -> Self {
        Self::Fifo(VecDeque::new())
    }
    #[must_use]
    pub fn lifo() -> Self {
        Self::Lifo(Vec::new())
    }

    #[inline(always)]
    pub fn push(&mut self, s: St) {
        match self {
            Self::Fifo(queue) => queue.push_back(s),
            Self::Lifo(stack) => stack.push(s),
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn pop(&mut self) -> Option<St> {
        match self {
            Self::Fifo(queue) => queue.pop_front(),
            Self::Lifo(stack) => stack.pop(),
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Fifo(queue) => queue.len(),
            Self::Lifo(stack) => stack.len(),
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
