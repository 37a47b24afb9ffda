use std::collections::HashMap;
use std::sync::{Condvar, Mutex};
use tracing::debug;

/// Per-table exclusive lock table.
///
/// One boolean flag per table name: set while a writer holds the table.
/// Writers block until the flag clears, then set it; readers block until the
/// flag clears but set nothing, so readers never exclude each other. Entries
/// are created lazily on first access and live for the process lifetime.
///
/// Waits are unbounded. A holder that never releases blocks every other
/// caller on that table.
#[derive(Debug, Default)]
pub struct LockManager {
    flags: Mutex<HashMap<String, bool>>,
    cv: Condvar,
}

impl LockManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until no writer holds `table`, then marks it held. The
    /// returned guard clears the flag on drop, on every exit path.
    pub fn acquire_write(&self, table: &str) -> WriteGuard<'_> {
        let mut flags = self.flags.lock().expect("lock table mutex poisoned");
        while flags.get(table).copied().unwrap_or(false) {
            debug!(table, "waiting for write lock");
            flags = self.cv.wait(flags).expect("lock table mutex poisoned");
        }
        flags.insert(table.to_string(), true);

        WriteGuard {
            locks: self,
            table: table.to_string(),
        }
    }

    /// Blocks until no writer holds `table`. Readers set no flag; the guard
    /// only wakes waiters on drop.
    pub fn acquire_read(&self, table: &str) -> ReadGuard<'_> {
        let mut flags = self.flags.lock().expect("lock table mutex poisoned");
        while flags.get(table).copied().unwrap_or(false) {
            debug!(table, "waiting for read lock");
            flags = self.cv.wait(flags).expect("lock table mutex poisoned");
        }

        ReadGuard { locks: self }
    }

    fn release_write(&self, table: &str) {
        let mut flags = self.flags.lock().expect("lock table mutex poisoned");
        flags.insert(table.to_string(), false);
        self.cv.notify_all();
    }

    /// True while a writer holds `table`.
    #[must_use]
    pub fn is_write_locked(&self, table: &str) -> bool {
        let flags = self.flags.lock().expect("lock table mutex poisoned");
        flags.get(table).copied().unwrap_or(false)
    }
}

/// Exclusive hold on one table, released on drop.
#[derive(Debug)]
pub struct WriteGuard<'a> {
    locks: &'a LockManager,
    table: String,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.locks.release_write(&self.table);
    }
}

/// Read-side bracket; wakes waiters on drop.
#[derive(Debug)]
pub struct ReadGuard<'a> {
    locks: &'a LockManager,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.locks.cv.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_write_guard_sets_and_clears_flag() {
        let locks = LockManager::new();
        {
            let _guard = locks.acquire_write("users");
            assert!(locks.is_write_locked("users"));
        }
        assert!(!locks.is_write_locked("users"));
    }

    #[test]
    fn test_guard_releases_on_early_return() {
        let locks = LockManager::new();
        let failing = |locks: &LockManager| -> Result<(), ()> {
            let _guard = locks.acquire_write("users");
            Err(())
        };
        assert!(failing(&locks).is_err());
        assert!(!locks.is_write_locked("users"));
    }

    #[test]
    fn test_locks_are_per_table() {
        let locks = LockManager::new();
        let _users = locks.acquire_write("users");
        assert!(!locks.is_write_locked("orders"));
        let _orders = locks.acquire_write("orders");
        assert!(locks.is_write_locked("orders"));
    }

    #[test]
    fn test_second_writer_blocks_until_release() {
        let locks = Arc::new(LockManager::new());
        let entered = Arc::new(AtomicUsize::new(0));

        let guard = locks.acquire_write("users");

        let locks2 = Arc::clone(&locks);
        let entered2 = Arc::clone(&entered);
        let waiter = thread::spawn(move || {
            let _guard = locks2.acquire_write("users");
            entered2.store(1, Ordering::SeqCst);
        });

        // the second writer must not get in while the first holds the flag
        thread::sleep(Duration::from_millis(50));
        assert_eq!(entered.load(Ordering::SeqCst), 0);

        drop(guard);
        waiter.join().unwrap();
        assert_eq!(entered.load(Ordering::SeqCst), 1);
        assert!(!locks.is_write_locked("users"));
    }

    #[test]
    fn test_reader_blocks_while_writer_holds() {
        let locks = Arc::new(LockManager::new());
        let entered = Arc::new(AtomicUsize::new(0));

        let guard = locks.acquire_write("users");

        let locks2 = Arc::clone(&locks);
        let entered2 = Arc::clone(&entered);
        let reader = thread::spawn(move || {
            let _guard = locks2.acquire_read("users");
            entered2.store(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(50));
        assert_eq!(entered.load(Ordering::SeqCst), 0);

        drop(guard);
        reader.join().unwrap();
        assert_eq!(entered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_readers_do_not_exclude_each_other() {
        let locks = LockManager::new();
        let _first = locks.acquire_read("users");
        // a second reader must get through while the first is held
        let _second = locks.acquire_read("users");
    }

    #[test]
    fn test_writer_queue_drains() {
        let locks = Arc::new(LockManager::new());
        let count = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let count = Arc::clone(&count);
                thread::spawn(move || {
                    let _guard = locks.acquire_write("users");
                    count.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(count.load(Ordering::SeqCst), 8);
        assert!(!locks.is_write_locked("users"));
    }
}
