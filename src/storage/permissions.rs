//! Storage permissions
//!
//! The permission gate decides whether public shared storage may be touched.
//! Platform policy lives behind the `PermissionGate` trait.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

use crate::config::PermissionConfig;

/// Authorization state for a storage scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
    PromptWithRationale,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Prompt => "prompt",
            PermissionState::PromptWithRationale => "prompt-with-rationale",
        };
        f.write_str(name)
    }
}

/// Storage areas that need an explicit grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionScope {
    PublicStorage,
}

/// Decides access to storage outside the process-private sandbox
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Current state, without prompting
    fn current_state(&self, scope: PermissionScope) -> PermissionState;

    /// Ask for access. May wait on user interaction; a dismissed prompt
    /// resolves with the pre-request state.
    async fn request(&self, scope: PermissionScope) -> PermissionState;
}

/// Gate driven by configuration
pub struct PolicyPermissionGate {
    state: RwLock<PermissionState>,
    grant_on_request: bool,
}

impl PolicyPermissionGate {
    pub fn new(initial: PermissionState, grant_on_request: bool) -> Self {
        Self {
            state: RwLock::new(initial),
            grant_on_request,
        }
    }

    pub fn from_config(config: &PermissionConfig) -> Self {
        Self::new(config.public_storage, config.grant_on_request)
    }
}

#[async_trait]
impl PermissionGate for PolicyPermissionGate {
    fn current_state(&self, _scope: PermissionScope) -> PermissionState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    async fn request(&self, scope: PermissionScope) -> PermissionState {
        let current = self.current_state(scope);
        if current == PermissionState::Granted || !self.grant_on_request {
            return current;
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = PermissionState::Granted;
        info!("Public storage permission granted (was {})", current);
        PermissionState::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_grants_when_policy_allows() {
        let gate = PolicyPermissionGate::new(PermissionState::Prompt, true);
        assert_eq!(
            gate.current_state(PermissionScope::PublicStorage),
            PermissionState::Prompt
        );
        assert_eq!(
            gate.request(PermissionScope::PublicStorage).await,
            PermissionState::Granted
        );
        assert_eq!(
            gate.current_state(PermissionScope::PublicStorage),
            PermissionState::Granted
        );
    }

    #[tokio::test]
    async fn dismissed_request_keeps_previous_state() {
        let gate = PolicyPermissionGate::new(PermissionState::PromptWithRationale, false);
        assert_eq!(
            gate.request(PermissionScope::PublicStorage).await,
            PermissionState::PromptWithRationale
        );
    }

    #[test]
    fn states_serialize_kebab_case() {
        let json = serde_json::to_string(&PermissionState::PromptWithRationale).unwrap();
        assert_eq!(json, "\"prompt-with-rationale\"");
    }
}
