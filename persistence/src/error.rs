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

//! Persistence error types

use tether_common::EntityKey;
use thiserror::Error;

/// Errors that can occur while querying or synchronizing relationships.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A list member already belongs to a different owner.
    #[error("Entity {child} belongs to {current}, not {owner}")]
    ForeignChild {
        child: EntityKey,
        owner: EntityKey,
        current: EntityKey,
    },

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration is present but unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
