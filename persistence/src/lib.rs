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

//! Tether Persistence
//!
//! Synchronizable list queries over one-to-many relationships.
//!
//! An owner entity exposes its children as a [`ManyQuery`]. Callers edit the
//! materialized list, and the [`RelationSynchronizer`] writes those edits back
//! to a [`RelationStore`] during a save pass:
//!
//! ```ignore
//! let mut children = ManyQuery::new(owner, store.clone());
//! children.as_list().await?.remove(0);
//!
//! let synchronizer = RelationSynchronizer::new(store, SyncConfig::default());
//! let report = synchronizer.sync(&mut children).await?;
//! assert_eq!(report.detached, 1);
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod many;
pub mod query;
pub mod store;
pub mod sync;
pub mod tracked;

pub use config::{RemovalPolicy, SyncConfig};
pub use error::{PersistenceError, PersistenceResult};
pub use manager::{RelationSynchronizer, SyncReport};
pub use many::ManyQuery;
pub use query::ListQuery;
pub use store::{MemoryStore, RelationStore};
pub use sync::SyncListQuery;
pub use tracked::TrackedList;
