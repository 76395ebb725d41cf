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

//! Base list query over the children of an owner

use crate::error::PersistenceResult;
use crate::tracked::TrackedList;
use async_trait::async_trait;
use tether_common::{EntityKey, Owned};

/// Read-only query over the "many" side of a one-to-many relationship.
///
/// The `fetch` family always reads the backing store. [`ListQuery::as_list`]
/// hands out the editable in-memory copy that a save pass later writes back.
#[async_trait]
pub trait ListQuery<T: Owned>: Send + Sync {
    /// Key of the owning entity
    fn owner(&self) -> &EntityKey;

    /// Every stored child of the owner, in insertion order.
    async fn fetch(&self) -> PersistenceResult<Vec<T>>;

    /// A window of [`ListQuery::fetch`].
    async fn fetch_page(&self, limit: usize, offset: usize) -> PersistenceResult<Vec<T>>;

    /// Number of stored children.
    async fn count(&self) -> PersistenceResult<usize>;

    /// First stored child, if any.
    async fn first(&self) -> PersistenceResult<Option<T>> {
        Ok(self.fetch_page(1, 0).await?.into_iter().next())
    }

    /// The editable list, loaded from the store when it is not synchronized.
    async fn as_list(&mut self) -> PersistenceResult<&mut TrackedList<T>>;

    /// Reload the editable list from the store unconditionally.
    async fn force_sync(&mut self) -> PersistenceResult<&mut TrackedList<T>>;
}
