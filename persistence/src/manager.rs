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

//! Save pass for one-to-many relationships
//!
//! When an owner is saved, the edits made to its [`SyncListQuery`] are
//! written back to the [`RelationStore`]:
//! - Removed children are detached (owner cleared) or deleted, per
//!   [`RemovalPolicy`]
//! - Children added to the list are attached to the owner
//! - The removal list is cleared and the query marked synchronized

use crate::config::{RemovalPolicy, SyncConfig};
use crate::error::{PersistenceError, PersistenceResult};
use crate::query::ListQuery;
use crate::store::RelationStore;
use crate::sync::SyncListQuery;
use metrics::counter;
use std::sync::Arc;
use tether_common::{EntityKey, Owned};
use tracing::{debug, info, instrument};

/// Outcome of a single save pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Children whose owner reference was set to the owner
    pub attached: usize,
    /// Removed children kept with no owner
    pub detached: usize,
    /// Removed children deleted from the store
    pub deleted: usize,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.attached == 0 && self.detached == 0 && self.deleted == 0
    }
}

/// Writes relationship list edits back to a store.
pub struct RelationSynchronizer<S: ?Sized> {
    store: Arc<S>,
    config: SyncConfig,
}

impl<S: ?Sized> std::fmt::Debug for RelationSynchronizer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationSynchronizer")
            .field("store", &"Arc<dyn RelationStore>")
            .field("config", &self.config)
            .finish()
    }
}

impl<S: ?Sized> RelationSynchronizer<S> {
    pub fn new(store: Arc<S>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run the save pass for the relationship behind `query`.
    ///
    /// A query that is not synchronized has no edits to write and yields an
    /// empty report. On a store error the removal list is left intact so the
    /// pass can be retried.
    #[instrument(skip(self, query), fields(owner = %query.owner()))]
    pub async fn sync<T, Q>(&self, query: &mut Q) -> PersistenceResult<SyncReport>
    where
        T: Owned,
        S: RelationStore<T>,
        Q: SyncListQuery<T> + ?Sized,
    {
        let mut report = SyncReport::default();
        if !query.is_sync() {
            debug!("List was never loaded, nothing to write");
            return Ok(report);
        }

        let owner = *query.owner();
        let removed = query.as_list_to_remove();

        let list = query.as_list().await?;
        if self.config.strict_ownership {
            for child in list.iter() {
                if let Some(current) = child.owner().filter(|current| current != &owner) {
                    return Err(PersistenceError::ForeignChild {
                        child: child.key(),
                        owner,
                        current,
                    });
                }
            }
        }

        for child in removed {
            match self.config.removal() {
                RemovalPolicy::Detach => {
                    if self.detach::<T>(&owner, &child.key()).await? {
                        report.detached += 1;
                    }
                }
                RemovalPolicy::Delete => {
                    if self.store.delete(&child.key()).await? {
                        report.deleted += 1;
                    }
                }
            }
        }

        for child in list.iter_mut() {
            if child.is_owned_by(&owner) {
                continue;
            }
            if let Some(previous) = child.owner() {
                debug!("Moving {} from {} to {}", child.key(), previous, owner);
            }
            // The listed copy only takes the new owner once the store has it.
            let mut attached = child.clone();
            attached.set_owner(Some(owner));
            self.store.put(attached).await?;
            child.set_owner(Some(owner));
            report.attached += 1;
        }

        query.clear_removed();
        query.set_sync(true);

        counter!("tether.relation.attached").increment(report.attached as u64);
        counter!("tether.relation.detached").increment(report.detached as u64);
        counter!("tether.relation.deleted").increment(report.deleted as u64);
        if !report.is_empty() {
            info!(
                "Synchronized relationship: {} attached, {} detached, {} deleted",
                report.attached, report.detached, report.deleted
            );
        }

        Ok(report)
    }

    /// Clear the owner of a removed child if the store still has it under
    /// `owner`.
    async fn detach<T>(&self, owner: &EntityKey, key: &EntityKey) -> PersistenceResult<bool>
    where
        T: Owned,
        S: RelationStore<T>,
    {
        match self.store.get(key).await? {
            Some(mut stored) if stored.is_owned_by(owner) => {
                stored.set_owner(None);
                self.store.put(stored).await?;
                Ok(true)
            }
            Some(_) => {
                debug!("{} already left {}, skipping detach", key, owner);
                Ok(false)
            }
            None => {
                debug!("{} is not stored, skipping detach", key);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::many::ManyQuery;
    use crate::store::MemoryStore;
    use tether_common::Entity;
    use tracing_test::traced_test;

    #[derive(Clone, Debug, PartialEq)]
    struct Line {
        key: EntityKey,
        owner: Option<EntityKey>,
        sku: &'static str,
    }

    impl Line {
        fn new(owner: Option<EntityKey>, sku: &'static str) -> Self {
            Self {
                key: EntityKey::new(),
                owner,
                sku,
            }
        }
    }

    impl Entity for Line {
        fn key(&self) -> EntityKey {
            self.key
        }
    }

    impl Owned for Line {
        fn owner(&self) -> Option<EntityKey> {
            self.owner
        }

        fn set_owner(&mut self, owner: Option<EntityKey>) {
            self.owner = owner;
        }
    }

    async fn order_with(skus: &[&'static str]) -> (EntityKey, Arc<MemoryStore<Line>>) {
        let order = EntityKey::new();
        let store = Arc::new(MemoryStore::new());
        for sku in skus {
            store.put(Line::new(Some(order), sku)).await.unwrap();
        }
        (order, store)
    }

    #[tokio::test]
    async fn test_unloaded_query_is_untouched() {
        let (order, store) = order_with(&["a"]).await;
        let mut lines = ManyQuery::new(order, store.clone());
        let sync = RelationSynchronizer::new(store, SyncConfig::default());

        let report = sync.sync(&mut lines).await.unwrap();
        assert!(report.is_empty());
        assert!(!lines.is_sync());
    }

    #[tokio::test]
    async fn test_detach_removed_children() {
        let (order, store) = order_with(&["a", "b", "c"]).await;
        let mut lines = ManyQuery::new(order, store.clone());
        let removed = lines.as_list().await.unwrap().remove(1).unwrap();

        let sync = RelationSynchronizer::new(store.clone(), SyncConfig::default());
        let report = sync.sync(&mut lines).await.unwrap();

        assert_eq!(
            report,
            SyncReport {
                attached: 0,
                detached: 1,
                deleted: 0
            }
        );
        assert!(lines.as_list_to_remove().is_empty());
        assert!(lines.is_sync());

        let orphan = store.get(&removed.key).await.unwrap().unwrap();
        assert_eq!(orphan.owner, None);
        assert_eq!(store.count_children(&order).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_removed_children() {
        let (order, store) = order_with(&["a", "b"]).await;
        let mut lines = ManyQuery::new(order, store.clone());
        lines.as_list().await.unwrap().clear();

        let sync = RelationSynchronizer::new(
            store.clone(),
            SyncConfig::new(RemovalPolicy::Delete, false),
        );
        let report = sync.sync(&mut lines).await.unwrap();

        assert_eq!(report.deleted, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_attach_new_children() {
        let (order, store) = order_with(&["a"]).await;
        let mut lines = ManyQuery::new(order, store.clone());
        lines.as_list().await.unwrap().push(Line::new(None, "b"));

        let sync = RelationSynchronizer::new(store.clone(), SyncConfig::default());
        let report = sync.sync(&mut lines).await.unwrap();

        assert_eq!(report.attached, 1);
        let skus: Vec<_> = lines.fetch().await.unwrap().iter().map(|l| l.sku).collect();
        assert_eq!(skus, vec!["a", "b"]);
        assert!(lines.as_list().await.unwrap().iter().all(|l| l.owner == Some(order)));
    }

    #[tokio::test]
    async fn test_second_pass_is_empty() {
        let (order, store) = order_with(&["a", "b"]).await;
        let mut lines = ManyQuery::new(order, store.clone());
        lines.as_list().await.unwrap().remove(0);

        let sync = RelationSynchronizer::new(store, SyncConfig::default());
        assert!(!sync.sync(&mut lines).await.unwrap().is_empty());
        assert!(sync.sync(&mut lines).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_strict_ownership_rejects_foreign_child() {
        let (order, store) = order_with(&[]).await;
        let other = EntityKey::new();
        let foreign = Line::new(Some(other), "x");
        store.put(foreign.clone()).await.unwrap();

        let mut lines = ManyQuery::new(order, store.clone());
        lines.as_list().await.unwrap().push(foreign.clone());

        let strict = RelationSynchronizer::new(
            store.clone(),
            SyncConfig::new(RemovalPolicy::Detach, true),
        );
        match strict.sync(&mut lines).await {
            Err(PersistenceError::ForeignChild { child, current, .. }) => {
                assert_eq!(child, foreign.key);
                assert_eq!(current, other);
            }
            unexpected => panic!("Expected ForeignChild, got {:?}", unexpected),
        }
        assert_eq!(store.count_children(&other).await.unwrap(), 1);

        let lenient = RelationSynchronizer::new(store.clone(), SyncConfig::default());
        let report = lenient.sync(&mut lines).await.unwrap();
        assert_eq!(report.attached, 1);
        assert_eq!(store.count_children(&other).await.unwrap(), 0);
        assert_eq!(store.count_children(&order).await.unwrap(), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_pass_is_logged() {
        let (order, store) = order_with(&["a"]).await;
        let mut lines = ManyQuery::new(order, store.clone());
        lines.as_list().await.unwrap().push(Line::new(None, "b"));

        let sync = RelationSynchronizer::new(store, SyncConfig::default());
        sync.sync(&mut lines).await.unwrap();

        assert!(logs_contain("1 attached, 0 detached, 0 deleted"));
    }

    #[tokio::test]
    async fn test_detach_keeps_newer_store_copy() {
        let (order, store) = order_with(&["a"]).await;
        let mut lines = ManyQuery::new(order, store.clone());
        let removed = lines.as_list().await.unwrap().remove(0).unwrap();

        let mut newer = removed.clone();
        newer.sku = "a-revised";
        store.put(newer).await.unwrap();

        let sync = RelationSynchronizer::new(store.clone(), SyncConfig::default());
        assert_eq!(sync.sync(&mut lines).await.unwrap().detached, 1);

        let stored = store.get(&removed.key).await.unwrap().unwrap();
        assert_eq!(stored.sku, "a-revised");
        assert_eq!(stored.owner, None);
    }
}
