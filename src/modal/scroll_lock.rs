//! Page-level scroll lock shared by all modals.
//!
//! The lock is reference counted so stacked modals (a discard confirmation
//! above the memo editor) each hold their own guard. The page scrolls again
//! only after the last guard is dropped.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Rc<Cell<usize>>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        let count = self.holders.get() + 1;
        self.holders.set(count);
        tracing::debug!("Scroll lock acquired ({} holders)", count);
        ScrollLockGuard {
            holders: Rc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    pub fn holders(&self) -> usize {
        self.holders.get()
    }
}

/// Releases its share of the lock when dropped
#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Rc<Cell<usize>>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        let count = self.holders.get().saturating_sub(1);
        self.holders.set(count);
        tracing::debug!("Scroll lock released ({} holders)", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guards() {
        let lock = ScrollLock::new();
        let outer = lock.acquire();
        let inner = lock.acquire();
        assert_eq!(lock.holders(), 2);
        drop(outer);
        assert!(lock.is_locked());
        drop(inner);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_clones_share_count() {
        let lock = ScrollLock::new();
        let other = lock.clone();
        let _guard = other.acquire();
        assert!(lock.is_locked());
    }
}
