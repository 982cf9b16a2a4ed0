//! Arena of keys addressed by integer handle
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::curve::EcCurve;
use crate::error::{KeyError, KeyResult};
use crate::key_types::{KeyMetadata, KeyOrigin};
use std::sync::Arc;

/// Ids must fit a C `int` on the FFI side
const MAX_ID: u32 = i32::MAX as u32;

struct Slot<T> {
    key: Arc<T>,
    metadata: KeyMetadata,
}

/// Append-only table of keys.
///
/// Slot 0 is never issued, and released slots stay empty, so an id is
/// never handed out twice.
pub(crate) struct HandleTable<T> {
    slots: Vec<Option<Slot<T>>>,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self { slots: vec![None] }
    }

    pub fn insert(&mut self, key: T, curve: EcCurve, origin: KeyOrigin) -> KeyResult<u32> {
        let id = u32::try_from(self.slots.len()).map_err(|_| KeyError::Capacity)?;
        if id > MAX_ID {
            return Err(KeyError::Capacity);
        }

        self.slots.push(Some(Slot {
            key: Arc::new(key),
            metadata: KeyMetadata::new(id, curve, origin),
        }));
        Ok(id)
    }

    fn slot(&self, id: u32) -> Option<&Slot<T>> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    pub fn get(&self, id: u32) -> Option<Arc<T>> {
        self.slot(id).map(|slot| Arc::clone(&slot.key))
    }

    pub fn metadata(&self, id: u32) -> Option<KeyMetadata> {
        self.slot(id).map(|slot| slot.metadata.clone())
    }

    pub fn remove(&mut self, id: u32) -> Option<KeyMetadata> {
        self.slots
            .get_mut(id as usize)
            .and_then(Option::take)
            .map(|slot| slot.metadata)
    }

    /// Live ids in ascending order
    pub fn ids(&self) -> Vec<u32> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(id, _)| id as u32)
            .collect()
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
