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

//! List queries a persistence manager can synchronize

use crate::query::ListQuery;
use tether_common::Owned;

/// A [`ListQuery`] that carries the state a save pass needs.
///
/// The synchronization flag says whether the in-memory list mirrors the
/// store. While it is `false`, the next [`ListQuery::as_list`] reloads from
/// the store and forgets pending removals.
pub trait SyncListQuery<T: Owned>: ListQuery<T> {
    /// Record the synchronization flag. Returns the same query for chaining.
    fn set_sync(&mut self, is_sync: bool) -> &mut Self;

    /// Whether the in-memory list currently mirrors the store.
    fn is_sync(&self) -> bool;

    /// Children taken out of the list since it was loaded or last saved, in
    /// removal order. Does not drain.
    fn as_list_to_remove(&self) -> Vec<T>;

    /// Forget the removals once a save pass has written them.
    fn clear_removed(&mut self);
}
