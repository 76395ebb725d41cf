//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Save pass configuration

use crate::error::{PersistenceError, PersistenceResult};
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// What the save pass does with children removed from an owner's list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Clear the child's owner reference and keep the child.
    #[default]
    Detach,
    /// Delete the child from the store.
    Delete,
}

impl FromStr for RemovalPolicy {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detach" => Ok(RemovalPolicy::Detach),
            "delete" => Ok(RemovalPolicy::Delete),
            other => Err(PersistenceError::Config(format!(
                "Unknown removal policy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalPolicy::Detach => write!(f, "detach"),
            RemovalPolicy::Delete => write!(f, "delete"),
        }
    }
}

/// Configuration for [`RelationSynchronizer`](crate::manager::RelationSynchronizer).
///
/// String values may reference environment variables (`${VAR}` or
/// `${VAR:-default}`).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Handling of removed children
    #[serde(default)]
    pub removal: EnvField<RemovalPolicy>,

    /// Reject list members that already belong to another owner instead of
    /// moving them.
    #[serde(default)]
    pub strict_ownership: bool,
}

impl SyncConfig {
    /// Build a configuration in code.
    pub fn new(removal: RemovalPolicy, strict_ownership: bool) -> Self {
        Self {
            removal: EnvField::from(removal),
            strict_ownership,
        }
    }

    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading sync configuration from file: {}", path.display());
        let file = std::fs::File::open(path)?;
        let conf = serde_yaml::from_reader(file)?;
        Ok(conf)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> PersistenceResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Active removal policy
    pub fn removal(&self) -> RemovalPolicy {
        *self.removal
    }
}
