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

//! One-to-many relationship list query

use crate::error::PersistenceResult;
use crate::query::ListQuery;
use crate::store::RelationStore;
use crate::sync::SyncListQuery;
use crate::tracked::TrackedList;
use async_trait::async_trait;
use std::sync::Arc;
use tether_common::{EntityKey, Owned};
use tracing::{debug, instrument, warn};

/// The children of one owner, backed by a [`RelationStore`].
pub struct ManyQuery<T, S: ?Sized> {
    owner: EntityKey,
    store: Arc<S>,
    list: TrackedList<T>,
    is_sync: bool,
}

impl<T, S: ?Sized> std::fmt::Debug for ManyQuery<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManyQuery")
            .field("owner", &self.owner)
            .field("store", &"Arc<dyn RelationStore>")
            .field("is_sync", &self.is_sync)
            .finish()
    }
}

impl<T, S> ManyQuery<T, S>
where
    T: Owned,
    S: RelationStore<T> + ?Sized,
{
    /// Query for an owner that already exists in the store.
    ///
    /// The list is loaded lazily on first use.
    pub fn new(owner: EntityKey, store: Arc<S>) -> Self {
        Self {
            owner,
            store,
            list: TrackedList::new(),
            is_sync: false,
        }
    }

    /// Query for an owner that has never been stored and so has no children
    /// to load.
    pub fn detached(owner: EntityKey, store: Arc<S>) -> Self {
        Self {
            owner,
            store,
            list: TrackedList::new(),
            is_sync: true,
        }
    }

    #[instrument(skip(self), fields(owner = %self.owner))]
    async fn reload(&mut self) -> PersistenceResult<()> {
        let children = self.store.children_of(&self.owner, None, 0).await?;
        let pending = self.list.removed().len();
        if pending > 0 {
            warn!("Discarding {} pending removals on reload", pending);
        }
        debug!("Loaded {} children", children.len());
        self.list = TrackedList::from(children);
        self.is_sync = true;
        Ok(())
    }
}

#[async_trait]
impl<T, S> ListQuery<T> for ManyQuery<T, S>
where
    T: Owned,
    S: RelationStore<T> + ?Sized,
{
    fn owner(&self) -> &EntityKey {
        &self.owner
    }

    async fn fetch(&self) -> PersistenceResult<Vec<T>> {
        self.store.children_of(&self.owner, None, 0).await
    }

    async fn fetch_page(&self, limit: usize, offset: usize) -> PersistenceResult<Vec<T>> {
        self.store.children_of(&self.owner, Some(limit), offset).await
    }

    async fn count(&self) -> PersistenceResult<usize> {
        self.store.count_children(&self.owner).await
    }

    async fn as_list(&mut self) -> PersistenceResult<&mut TrackedList<T>> {
        if !self.is_sync {
            self.reload().await?;
        }
        Ok(&mut self.list)
    }

    async fn force_sync(&mut self) -> PersistenceResult<&mut TrackedList<T>> {
        self.reload().await?;
        Ok(&mut self.list)
    }
}

impl<T, S> SyncListQuery<T> for ManyQuery<T, S>
where
    T: Owned,
    S: RelationStore<T> + ?Sized,
{
    fn set_sync(&mut self, is_sync: bool) -> &mut Self {
        self.is_sync = is_sync;
        self
    }

    fn is_sync(&self) -> bool {
        self.is_sync
    }

    fn as_list_to_remove(&self) -> Vec<T> {
        self.list.removed().to_vec()
    }

    fn clear_removed(&mut self) {
        self.list.take_removed();
    }
}
