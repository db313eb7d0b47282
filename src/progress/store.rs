use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::{SessionSnapshot, rounded_ratio};

use super::backend::ProgressBackend;

/// User namespace used when nobody has logged in.
pub const DEFAULT_USER: &str = "guest";

/// Highest storable percentage.
const MAX_PERCENTAGE: u8 = 100;

/// Everything persisted under one storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
    #[serde(default)]
    pub users: BTreeMap<String, UserProgress>,
}

impl ProgressData {
    pub fn user(&self, name: &str) -> Option<&UserProgress> {
        self.users.get(name)
    }

    pub fn user_mut(&mut self, name: &str) -> &mut UserProgress {
        self.users.entry(name.to_string()).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Module id to latest completed percentage.
    #[serde(default)]
    pub modules: BTreeMap<String, u8>,
    /// Session that was still running when the program last exited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_session: Option<SessionSnapshot>,
}

/// Per-user, per-module completion percentages.
///
/// Reads come from an in-memory copy; every mutation is written through to
/// the backend immediately. Backend failures are logged and otherwise
/// ignored. An unreadable file is moved aside by the file backend and the
/// store starts empty.
pub struct ProgressStore<B: ProgressBackend> {
    backend: B,
    user: String,
    module_ids: Vec<String>,
    data: ProgressData,
}

impl<B: ProgressBackend> ProgressStore<B> {
    /// Opens the store for `user`. `module_ids` are the configured modules
    /// that [`overall`](Self::overall) averages over.
    pub fn open(backend: B, user: impl Into<String>, module_ids: Vec<String>) -> Self {
        let data = match backend.load() {
            Ok(Some(data)) => data,
            Ok(None) => ProgressData::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored progress, starting empty");
                ProgressData::default()
            }
        };

        Self {
            backend,
            user: user.into(),
            module_ids,
            data,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Switches the namespace subsequent reads and writes use.
    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = user.into();
        tracing::debug!(user = %self.user, "progress user switched");
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stored percentage for `module_id`, 0 when absent.
    pub fn get(&self, module_id: &str) -> u8 {
        self.data
            .user(&self.user)
            .and_then(|u| u.modules.get(module_id))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrites the stored percentage, even if it is lower than before.
    pub fn set(&mut self, module_id: &str, percentage: u8) {
        let percentage = percentage.min(MAX_PERCENTAGE);
        self.data
            .user_mut(&self.user)
            .modules
            .insert(module_id.to_string(), percentage);
        tracing::info!(user = %self.user, module = %module_id, percentage, "progress saved");
        self.persist();
    }

    /// Average over all configured modules, rounded half-up.
    pub fn overall(&self) -> u8 {
        if self.module_ids.is_empty() {
            return 0;
        }
        let sum: u64 = self.module_ids.iter().map(|id| u64::from(self.get(id))).sum();
        rounded_ratio(sum, self.module_ids.len() as u64)
    }

    pub fn pending_session(&self) -> Option<&SessionSnapshot> {
        self.data
            .user(&self.user)
            .and_then(|u| u.pending_session.as_ref())
    }

    pub fn save_pending(&mut self, snapshot: SessionSnapshot) {
        tracing::info!(
            user = %self.user,
            module = %snapshot.module,
            answered = snapshot.answers.len(),
            "saving unfinished session"
        );
        self.data.user_mut(&self.user).pending_session = Some(snapshot);
        self.persist();
    }

    pub fn clear_pending(&mut self) {
        let cleared = self
            .data
            .users
            .get_mut(&self.user)
            .and_then(|u| u.pending_session.take())
            .is_some();
        if cleared {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.backend.save(&self.data) {
            tracing::warn!(error = %e, "failed to write progress");
        }
    }
}
