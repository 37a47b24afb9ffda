use crate::core::DbError;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// Per-user transaction envelope: IDLE until BEGIN, ACTIVE until COMMIT or
/// ROLLBACK, at most one active transaction per user identity.
///
/// Row-mutating commands apply to storage immediately even while ACTIVE; the
/// staged log records their command text so COMMIT can report what ran inside
/// the bracket and ROLLBACK can discard the record. It does not defer or undo
/// file mutations.
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    contexts: Mutex<HashMap<String, TxContext>>,
}

#[derive(Debug, Default)]
struct TxContext {
    active: bool,
    staged: Vec<String>,
}

impl TransactionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// IDLE -> ACTIVE. Fails if `user` already has an active transaction.
    pub fn begin(&self, user: &str) -> Result<(), DbError> {
        let mut contexts = self.contexts.lock().expect("transaction registry poisoned");
        let context = contexts.entry(user.to_string()).or_default();
        if context.active {
            return Err(DbError::TransactionAlreadyActive(user.to_string()));
        }
        context.active = true;
        context.staged.clear();
        info!(user, "transaction started");
        Ok(())
    }

    /// ACTIVE -> IDLE. Returns the staged command log, drained.
    pub fn commit(&self, user: &str) -> Result<Vec<String>, DbError> {
        let mut contexts = self.contexts.lock().expect("transaction registry poisoned");
        let context = contexts
            .get_mut(user)
            .filter(|c| c.active)
            .ok_or_else(|| DbError::NoActiveTransaction(user.to_string()))?;
        context.active = false;
        let staged = std::mem::take(&mut context.staged);
        info!(user, commands = staged.len(), "transaction committed");
        Ok(staged)
    }

    /// ACTIVE -> IDLE, discarding the staged log. Returns how many staged
    /// commands were discarded. Already-applied file mutations stay applied.
    pub fn rollback(&self, user: &str) -> Result<usize, DbError> {
        let mut contexts = self.contexts.lock().expect("transaction registry poisoned");
        let context = contexts
            .get_mut(user)
            .filter(|c| c.active)
            .ok_or_else(|| DbError::NoActiveTransaction(user.to_string()))?;
        context.active = false;
        let discarded = context.staged.len();
        context.staged.clear();
        info!(user, commands = discarded, "transaction rolled back");
        Ok(discarded)
    }

    /// Records the text of a row-mutating command if `user` is ACTIVE.
    pub fn stage(&self, user: &str, command: &str) {
        let mut contexts = self.contexts.lock().expect("transaction registry poisoned");
        if let Some(context) = contexts.get_mut(user).filter(|c| c.active) {
            context.staged.push(command.to_string());
        }
    }

    #[must_use]
    pub fn is_active(&self, user: &str) -> bool {
        let contexts = self.contexts.lock().expect("transaction registry poisoned");
        contexts.get(user).is_some_and(|c| c.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_commit_cycle() {
        let registry = TransactionRegistry::new();
        assert!(!registry.is_active("alice"));

        registry.begin("alice").unwrap();
        assert!(registry.is_active("alice"));

        registry.commit("alice").unwrap();
        assert!(!registry.is_active("alice"));
    }

    #[test]
    fn test_begin_while_active_fails() {
        let registry = TransactionRegistry::new();
        registry.begin("alice").unwrap();
        assert!(matches!(
            registry.begin("alice").unwrap_err(),
            DbError::TransactionAlreadyActive(_)
        ));
    }

    #[test]
    fn test_commit_while_idle_fails() {
        let registry = TransactionRegistry::new();
        assert!(matches!(
            registry.commit("alice").unwrap_err(),
            DbError::NoActiveTransaction(_)
        ));
    }

    #[test]
    fn test_rollback_then_commit_fails() {
        let registry = TransactionRegistry::new();
        registry.begin("alice").unwrap();
        registry.rollback("alice").unwrap();
        assert!(matches!(
            registry.commit("alice").unwrap_err(),
            DbError::NoActiveTransaction(_)
        ));
    }

    #[test]
    fn test_staged_log_is_drained_on_commit() {
        let registry = TransactionRegistry::new();
        registry.begin("alice").unwrap();
        registry.stage("alice", "INSERT INTO t VALUES (1);");
        registry.stage("alice", "DELETE FROM t WHERE a = 1;");

        let staged = registry.commit("alice").unwrap();
        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0], "INSERT INTO t VALUES (1);");

        // a fresh transaction starts with an empty log
        registry.begin("alice").unwrap();
        assert_eq!(registry.commit("alice").unwrap().len(), 0);
    }

    #[test]
    fn test_stage_while_idle_records_nothing() {
        let registry = TransactionRegistry::new();
        registry.stage("alice", "INSERT INTO t VALUES (1);");
        registry.begin("alice").unwrap();
        assert_eq!(registry.commit("alice").unwrap().len(), 0);
    }

    #[test]
    fn test_rollback_reports_discarded_count() {
        let registry = TransactionRegistry::new();
        registry.begin("alice").unwrap();
        registry.stage("alice", "INSERT INTO t VALUES (1);");
        assert_eq!(registry.rollback("alice").unwrap(), 1);
    }

    #[test]
    fn test_users_are_independent() {
        let registry = TransactionRegistry::new();
        registry.begin("alice").unwrap();
        registry.begin("bob").unwrap();
        registry.commit("alice").unwrap();
        assert!(registry.is_active("bob"));
    }
}
