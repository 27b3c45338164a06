//! Persisted entities: user accounts and tasks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::PasswordHash;
use crate::Verified;

/// Store-assigned account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account that passed registration but has no id yet.
///
/// Only the registration guard can build one, so every persisted account
/// carries a sanitized, validated username and email.
#[derive(Debug, Clone)]
pub struct NewAccount {
    username: String,
    email: String,
    password_hash: PasswordHash,
    verified: bool,
}

impl NewAccount {
    pub(crate) fn new(
        username: Verified<String>,
        email: Verified<String>,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            username: username.into_inner(),
            email: email.into_inner(),
            password_hash,
            verified: true,
        }
    }

    /// The sanitized username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Turns the candidate into a persisted account with the given id.
    ///
    /// Called by [`crate::AccountStore`] implementations.
    pub fn assign_id(self, id: AccountId) -> Account {
        Account {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            verified: self.verified,
        }
    }
}

/// A persisted user account.
///
/// The task subsystem only ever reads accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    username: String,
    email: String,
    password_hash: PasswordHash,
    verified: bool,
}

impl Account {
    /// Store-assigned id.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Unique, immutable username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Opaque password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether the account is verified.
    pub fn is_verified(&self) -> bool {
        self.verified
    }
}

/// Globally unique task identifier, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started. Initial state.
    #[default]
    #[serde(alias = "TODO")]
    Todo,
    /// Being worked on.
    #[serde(alias = "IN_PROGRESS")]
    InProgress,
    /// Finished.
    #[serde(alias = "DONE")]
    Done,
}

impl TaskStatus {
    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Todo => "Todo",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        };
        f.write_str(name)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Todo" | "TODO" => Ok(Self::Todo),
            "InProgress" | "IN_PROGRESS" => Ok(Self::InProgress),
            "Done" | "DONE" => Ok(Self::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// A persisted task.
///
/// `id`, `owner_id` and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    short_description: String,
    long_description: Option<String>,
    status: TaskStatus,
    owner_id: AccountId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub(crate) fn new(
        owner_id: AccountId,
        short_description: String,
        long_description: Option<String>,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskId::new(),
            short_description,
            long_description,
            status,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the mutable fields and refreshes `updated_at`.
    pub(crate) fn apply(
        &mut self,
        short_description: String,
        long_description: Option<String>,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) {
        self.short_description = short_description;
        self.long_description = long_description;
        self.status = status;
        self.updated_at = now.max(self.created_at);
    }

    /// Task id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Owning account.
    pub fn owner_id(&self) -> AccountId {
        self.owner_id
    }

    /// One-line summary.
    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// Optional free text.
    pub fn long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
    }

    /// Current status.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// External representation, without the owner.
    pub fn view(&self) -> TaskView {
        TaskView {
            id: self.id,
            short_description: self.short_description.clone(),
            long_description: self.long_description.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Task fields supplied by a caller on create or update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Required summary.
    pub short_description: Option<String>,
    /// Optional free text.
    pub long_description: Option<String>,
    /// Defaults to `Todo` on create, and to the current status on update.
    pub status: Option<TaskStatus>,
}

/// What callers see of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task id.
    pub id: TaskId,
    /// One-line summary.
    pub short_description: String,
    /// Optional free text.
    pub long_description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_task(now: DateTime<Utc>) -> Task {
        Task::new(
            AccountId(1),
            "Buy milk".to_string(),
            None,
            TaskStatus::Todo,
            now,
        )
    }

    #[test]
    fn new_task_starts_with_equal_timestamps() {
        let now = Utc::now();
        let task = sample_task(now);

        assert_eq!(task.created_at(), now);
        assert_eq!(task.updated_at(), now);
        assert_eq!(task.status(), TaskStatus::Todo);
    }

    #[test]
    fn apply_refreshes_updated_at_only() {
        let now = Utc::now();
        let mut task = sample_task(now);
        let id = task.id();
        let later = now + Duration::seconds(5);

        task.apply("Buy oat milk".to_string(), Some("2L".to_string()), TaskStatus::Done, later);

        assert_eq!(task.id(), id);
        assert_eq!(task.owner_id(), AccountId(1));
        assert_eq!(task.created_at(), now);
        assert_eq!(task.updated_at(), later);
        assert_eq!(task.short_description(), "Buy oat milk");
        assert_eq!(task.long_description(), Some("2L"));
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let now = Utc::now();
        let mut task = sample_task(now);

        task.apply("x".to_string(), None, TaskStatus::Todo, now - Duration::seconds(60));

        assert_eq!(task.updated_at(), now);
    }

    #[test]
    fn task_ids_are_unique() {
        assert_ne!(TaskId::new(), TaskId::new());
    }

    #[test]
    fn task_id_round_trips_through_display() {
        let id = TaskId::new();
        assert_eq!(id.to_string().parse::<TaskId>().unwrap(), id);
        assert!("not-a-uuid".parse::<TaskId>().is_err());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"InProgress\"");
        let legacy: TaskStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(legacy, TaskStatus::InProgress);
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("Later".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn status_display_names() {
        assert_eq!(TaskStatus::Todo.display_name(), "To Do");
        assert_eq!(TaskStatus::InProgress.display_name(), "In Progress");
        assert_eq!(TaskStatus::Done.display_name(), "Done");
    }

    #[test]
    fn view_hides_owner() {
        let task = sample_task(Utc::now());
        let json = serde_json::to_value(task.view()).unwrap();

        assert!(json.get("ownerId").is_none());
        assert!(json.get("owner_id").is_none());
        assert_eq!(json["shortDescription"], "Buy milk");
        assert_eq!(json["status"], "Todo");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn draft_reads_camel_case() {
        let draft: TaskDraft = serde_json::from_str(
            r#"{"shortDescription":"a","longDescription":"b","status":"Done"}"#,
        )
        .unwrap();

        assert_eq!(draft.short_description.as_deref(), Some("a"));
        assert_eq!(draft.long_description.as_deref(), Some("b"));
        assert_eq!(draft.status, Some(TaskStatus::Done));
    }
}
