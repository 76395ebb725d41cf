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

//! Entity and ownership contracts

use crate::key::EntityKey;

/// A stored value with a stable key.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Key the entity is stored under.
    fn key(&self) -> EntityKey;
}

/// An entity that can sit on the "many" side of a one-to-many relationship.
///
/// The owner reference is nullable: a child removed from its owner's list
/// keeps existing with no owner.
pub trait Owned: Entity {
    /// Key of the owning entity, if any.
    fn owner(&self) -> Option<EntityKey>;

    /// Replace the owner reference.
    fn set_owner(&mut self, owner: Option<EntityKey>);

    /// Check whether this entity currently belongs to `owner`
    fn is_owned_by(&self, owner: &EntityKey) -> bool {
        self.owner().as_ref() == Some(owner)
    }
}
