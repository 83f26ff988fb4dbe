/*
 * Copyright 2026 HeapDB Authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::catalog::schema::Schema;
use crate::error::{Error, Result};
use crate::storage::tuple::{RecordId, Tuple};
use crate::tx::TransactionId;
use std::sync::Arc;

pub const PAGE_SIZE: usize = 4096;
pub const PAGE_HEADER_SIZE: usize = 4;

pub type FileId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub file_id: FileId,
    pub page_no: usize,
}

#[derive(Debug, Clone)]
pub struct HeapPage {
    schema: Arc<Schema>,
    file_id: FileId,
    page_no: usize,
    slots: Vec<Option<Tuple>>,
    dirty: bool,
    last_dirtier: Option<TransactionId>,
    before_image: Option<Box<HeapPage>>,
}

impl HeapPage {
    pub fn slots_per_page(schema: &Schema) -> usize {
        let tuple_size = schema.tuple_size();
        if tuple_size == 0 {
            0
        } else {
            (PAGE_SIZE - PAGE_HEADER_SIZE) / tuple_size
        }
    }

    pub fn new(schema: Arc<Schema>, file_id: FileId, page_no: usize) -> Self {
        let slots = vec![None; Self::slots_per_page(&schema)];
        let mut page = Self {
            schema,
            file_id,
            page_no,
            slots,
            dirty: false,
            last_dirtier: None,
            before_image: None,
        };
        page.set_before_image();
        page
    }

    pub fn from_bytes(
        schema: Arc<Schema>,
        file_id: FileId,
        page_no: usize,
        raw: &[u8],
    ) -> Result<Self> {
        if raw.len() != PAGE_SIZE {
            return Err(Error::MalformedData(format!(
                "page {page_no} is {} bytes, expected {PAGE_SIZE}",
                raw.len()
            )));
        }
        let header: [u8; PAGE_HEADER_SIZE] =
            raw[..PAGE_HEADER_SIZE].try_into().expect("header bytes");
        let declared = u32::from_le_bytes(header) as usize;
        let n_slots = Self::slots_per_page(&schema);
        if declared > n_slots {
            return Err(Error::MalformedData(format!(
                "page {page_no} declares {declared} used slots, capacity is {n_slots}"
            )));
        }

        let tuple_size = schema.tuple_size();
        let mut slots = Vec::with_capacity(n_slots);
        for slot_no in 0..n_slots {
            let start = PAGE_HEADER_SIZE + slot_no * tuple_size;
            let body = &raw[start..start + tuple_size];
            if body.iter().all(|b| *b == 0) {
                slots.push(None);
            } else {
                let tuple =
                    Tuple::read_from(&schema, body)?.with_rid(RecordId { page_no, slot_no });
                slots.push(Some(tuple));
            }
        }

        let mut page = Self {
            schema,
            file_id,
            page_no,
            slots,
            dirty: false,
            last_dirtier: None,
            before_image: None,
        };
        page.set_before_image();
        Ok(page)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![0_u8; PAGE_SIZE];
        out[..PAGE_HEADER_SIZE].copy_from_slice(&(self.num_used() as u32).to_le_bytes());
        let tuple_size = self.schema.tuple_size();
        for (slot_no, slot) in self.slots.iter().enumerate() {
            if let Some(tuple) = slot {
                let start = PAGE_HEADER_SIZE + slot_no * tuple_size;
                tuple.write_to(&mut out[start..start + tuple_size])?;
            }
        }
        Ok(out)
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn num_used(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn num_empty(&self) -> usize {
        self.slots.len() - self.num_used()
    }

    pub fn insert(&mut self, tuple: &Tuple) -> Option<RecordId> {
        let slot_no = self.slots.iter().position(|s| s.is_none())?;
        let rid = RecordId {
            page_no: self.page_no,
            slot_no,
        };
        self.slots[slot_no] = Some(tuple.clone().with_rid(rid));
        Some(rid)
    }

    pub fn delete(&mut self, rid: RecordId) -> Result<()> {
        if rid.page_no != self.page_no || rid.slot_no >= self.slots.len() {
            return Err(Error::TupleNotFound(format!(
                "record ({}, {}) is not on page {}",
                rid.page_no, rid.slot_no, self.page_no
            )));
        }
        if self.slots[rid.slot_no].take().is_none() {
            return Err(Error::TupleNotFound(format!(
                "slot {} of page {} is already empty",
                rid.slot_no, self.page_no
            )));
        }
        Ok(())
    }

    pub fn tuple_iter(&self) -> impl Iterator<Item = &Tuple> + '_ {
        self.slots.iter().flatten()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, tid: TransactionId, dirty: bool) {
        self.dirty = dirty;
        if dirty {
            self.last_dirtier = Some(tid);
        }
    }

    pub fn last_dirtier(&self) -> Option<TransactionId> {
        self.last_dirtier
    }

    pub fn page_no(&self) -> usize {
        self.page_no
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn page_key(&self) -> PageKey {
        PageKey {
            file_id: self.file_id,
            page_no: self.page_no,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn set_before_image(&mut self) {
        let mut snapshot = self.clone();
        snapshot.before_image = None;
        self.before_image = Some(Box::new(snapshot));
    }

    pub fn before_image(&self) -> &HeapPage {
        // an image is captured at construction, so the fallback never shows
        self.before_image.as_deref().unwrap_or(self)
    }
}
