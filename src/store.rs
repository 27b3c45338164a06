//! Storage seams for accounts and tasks, plus in-memory implementations.
//!
//! Each store operation is atomic on its own. Nothing here locks across
//! operations: the account store's unique-username constraint is what
//! settles concurrent registrations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::model::{Account, AccountId, NewAccount, Task, TaskId};

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the constraint name.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    /// Any other backend failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Account persistence.
pub trait AccountStore: Send + Sync {
    /// Finds an account by exact, case-sensitive username.
    fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Persists a new account and assigns its id.
    ///
    /// Must fail with [`StoreError::UniqueViolation`] if the username exists.
    fn save(&self, account: NewAccount) -> StoreResult<Account>;
}

/// Task persistence.
pub trait TaskStore: Send + Sync {
    /// Finds a task by id.
    fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Inserts or replaces a task.
    fn save(&self, task: Task) -> StoreResult<Task>;

    /// Deletes a task. Deleting a missing id is not an error.
    fn delete_by_id(&self, id: TaskId) -> StoreResult<()>;

    /// Lists the owner's tasks, newest first.
    fn list_by_owner(&self, owner: AccountId) -> StoreResult<Vec<Task>>;
}

/// In-memory account store with a unique-username constraint.
#[derive(Debug)]
pub struct MemoryAccountStore {
    next_id: AtomicU64,
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    /// Creates an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    /// Returns true if no account is stored.
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for MemoryAccountStore {
    fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().get(username).cloned())
    }

    fn save(&self, account: NewAccount) -> StoreResult<Account> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(account.username()) {
            return Err(StoreError::UniqueViolation("username".to_string()));
        }
        let id = AccountId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let account = account.assign_id(id);
        accounts.insert(account.username().to_string(), account.clone());
        Ok(account)
    }
}

/// In-memory task store.
///
/// Listing orders by creation time, newest first, with insertion order as
/// the tie-breaker.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: RwLock<TaskTable>,
}

#[derive(Debug, Default)]
struct TaskTable {
    next_seq: u64,
    rows: HashMap<TaskId, (u64, Task)>,
}

impl MemoryTaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks across all owners.
    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    /// Returns true if no task is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().rows.is_empty()
    }
}

impl TaskStore for MemoryTaskStore {
    fn find_by_id(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.inner.read().rows.get(&id).map(|(_, t)| t.clone()))
    }

    fn save(&self, task: Task) -> StoreResult<Task> {
        let mut table = self.inner.write();
        let existing = table.rows.get(&task.id()).map(|(seq, _)| *seq);
        let seq = match existing {
            Some(seq) => seq,
            None => {
                table.next_seq += 1;
                table.next_seq
            }
        };
        table.rows.insert(task.id(), (seq, task.clone()));
        Ok(task)
    }

    fn delete_by_id(&self, id: TaskId) -> StoreResult<()> {
        self.inner.write().rows.remove(&id);
        Ok(())
    }

    fn list_by_owner(&self, owner: AccountId) -> StoreResult<Vec<Task>> {
        let table = self.inner.read();
        let mut rows: Vec<&(u64, Task)> = table
            .rows
            .values()
            .filter(|(_, t)| t.owner_id() == owner)
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b_seq.cmp(a_seq))
        });
        Ok(rows.into_iter().map(|(_, t)| t.clone()).collect())
    }
}
