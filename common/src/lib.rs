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

//! Tether Common Types
//!
//! This crate defines the shared types used across Tether:
//! - Entity keys
//! - The entity and ownership contracts a child must meet to sit in a
//!   one-to-many relationship

pub mod entity;
pub mod key;

pub use entity::{Entity, Owned};
pub use key::EntityKey;
