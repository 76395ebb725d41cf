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

//! Relationship store seam and its in-memory implementation

use crate::error::PersistenceResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tether_common::{EntityKey, Owned};
use tokio::sync::RwLock;
use tracing::debug;

/// Storage operations a save pass needs for the children of a relationship.
///
/// Children are returned in the order they were first stored.
#[async_trait]
pub trait RelationStore<T: Owned>: Send + Sync {
    /// Load a single entity
    async fn get(&self, key: &EntityKey) -> PersistenceResult<Option<T>>;

    /// Load the children of `owner`, skipping `offset` and returning at most `limit`.
    async fn children_of(
        &self,
        owner: &EntityKey,
        limit: Option<usize>,
        offset: usize,
    ) -> PersistenceResult<Vec<T>>;

    /// Count the children of `owner`
    async fn count_children(&self, owner: &EntityKey) -> PersistenceResult<usize>;

    /// Insert or replace an entity by key.
    async fn put(&self, entity: T) -> PersistenceResult<()>;

    /// Delete an entity, returning whether anything was deleted.
    async fn delete(&self, key: &EntityKey) -> PersistenceResult<bool>;
}

struct Entries<T> {
    next_seq: u64,
    map: BTreeMap<EntityKey, (u64, T)>,
}

/// Relationship store kept entirely in memory.
pub struct MemoryStore<T> {
    entries: RwLock<Entries<T>>,
}

impl<T> std::fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &"RwLock<BTreeMap<EntityKey, (u64, T)>>")
            .finish()
    }
}

impl<T: Owned> MemoryStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                next_seq: 0,
                map: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored entities
    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.map.is_empty()
    }
}

impl<T: Owned> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Owned> RelationStore<T> for MemoryStore<T> {
    async fn get(&self, key: &EntityKey) -> PersistenceResult<Option<T>> {
        let entries = self.entries.read().await;
        Ok(entries.map.get(key).map(|(_, entity)| entity.clone()))
    }

    async fn children_of(
        &self,
        owner: &EntityKey,
        limit: Option<usize>,
        offset: usize,
    ) -> PersistenceResult<Vec<T>> {
        let entries = self.entries.read().await;
        let mut children: Vec<&(u64, T)> = entries
            .map
            .values()
            .filter(|(_, entity)| entity.is_owned_by(owner))
            .collect();
        children.sort_by_key(|(seq, _)| *seq);

        Ok(children
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .map(|(_, entity)| entity.clone())
            .collect())
    }

    async fn count_children(&self, owner: &EntityKey) -> PersistenceResult<usize> {
        let entries = self.entries.read().await;
        Ok(entries
            .map
            .values()
            .filter(|(_, entity)| entity.is_owned_by(owner))
            .count())
    }

    async fn put(&self, entity: T) -> PersistenceResult<()> {
        let mut entries = self.entries.write().await;
        let key = entity.key();
        let existing = entries.map.get(&key).map(|(seq, _)| *seq);
        let seq = match existing {
            Some(seq) => seq,
            None => {
                let seq = entries.next_seq;
                entries.next_seq += 1;
                seq
            }
        };
        debug!("Storing entity {} (seq {})", key, seq);
        entries.map.insert(key, (seq, entity));
        Ok(())
    }

    async fn delete(&self, key: &EntityKey) -> PersistenceResult<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.map.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_common::Entity;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        key: EntityKey,
        owner: Option<EntityKey>,
        text: &'static str,
    }

    impl Entity for Note {
        fn key(&self) -> EntityKey {
            self.key
        }
    }

    impl Owned for Note {
        fn owner(&self) -> Option<EntityKey> {
            self.owner
        }

        fn set_owner(&mut self, owner: Option<EntityKey>) {
            self.owner = owner;
        }
    }

    fn note(owner: Option<EntityKey>, text: &'static str) -> Note {
        Note {
            key: EntityKey::new(),
            owner,
            text,
        }
    }

    #[tokio::test]
    async fn test_children_keep_insertion_order() {
        let store = MemoryStore::new();
        let owner = EntityKey::new();
        for text in ["one", "two", "three", "four"] {
            store.put(note(Some(owner), text)).await.unwrap();
        }
        store.put(note(None, "orphan")).await.unwrap();

        let all = store.children_of(&owner, None, 0).await.unwrap();
        let texts: Vec<_> = all.iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["one", "two", "three", "four"]);

        let page = store.children_of(&owner, Some(2), 1).await.unwrap();
        let texts: Vec<_> = page.iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["two", "three"]);

        assert_eq!(store.count_children(&owner).await.unwrap(), 4);
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn test_replace_keeps_position() {
        let store = MemoryStore::new();
        let owner = EntityKey::new();
        let mut first = note(Some(owner), "first");
        store.put(first.clone()).await.unwrap();
        store.put(note(Some(owner), "second")).await.unwrap();

        first.text = "first, edited";
        store.put(first.clone()).await.unwrap();

        let all = store.children_of(&owner, None, 0).await.unwrap();
        assert_eq!(all[0], first);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let n = note(None, "gone");
        store.put(n.clone()).await.unwrap();

        assert!(store.delete(&n.key).await.unwrap());
        assert!(!store.delete(&n.key).await.unwrap());
        assert!(store.get(&n.key).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
