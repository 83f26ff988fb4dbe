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
use crate::types::Field;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub page_no: usize,
    pub slot_no: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub schema: Arc<Schema>,
    pub fields: Vec<Field>,
    pub rid: Option<RecordId>,
}

impl Tuple {
    pub fn new(schema: Arc<Schema>, fields: Vec<Field>) -> Result<Self> {
        if fields.len() != schema.fields.len() {
            return Err(Error::TypeMismatch(format!(
                "tuple has {} fields, schema declares {}",
                fields.len(),
                schema.fields.len()
            )));
        }
        for (field, def) in fields.iter().zip(&schema.fields) {
            if field.ftype() != def.ftype {
                return Err(Error::TypeMismatch(format!(
                    "field {} is declared {} but holds {}",
                    def.name,
                    def.ftype,
                    field.ftype()
                )));
            }
        }
        Ok(Self {
            schema,
            fields,
            rid: None,
        })
    }

    pub fn with_rid(mut self, rid: RecordId) -> Self {
        self.rid = Some(rid);
        self
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn write_to(&self, out: &mut [u8]) -> Result<()> {
        if out.len() != self.schema.tuple_size() {
            return Err(Error::TypeMismatch(format!(
                "tuple needs {} bytes, slot has {}",
                self.schema.tuple_size(),
                out.len()
            )));
        }
        let mut offset = 0;
        for field in &self.fields {
            let width = field.ftype().byte_len();
            field.write_to(&mut out[offset..offset + width])?;
            offset += width;
        }
        Ok(())
    }

    pub fn read_from(schema: &Arc<Schema>, raw: &[u8]) -> Result<Tuple> {
        if raw.len() != schema.tuple_size() {
            return Err(Error::MalformedData(format!(
                "tuple slot has {} bytes, schema needs {}",
                raw.len(),
                schema.tuple_size()
            )));
        }
        let mut fields = Vec::with_capacity(schema.fields.len());
        let mut offset = 0;
        for def in &schema.fields {
            let width = def.ftype.byte_len();
            fields.push(Field::read_from(def.ftype, &raw[offset..offset + width])?);
            offset += width;
        }
        Ok(Tuple {
            schema: Arc::clone(schema),
            fields,
            rid: None,
        })
    }

    pub fn join(left: &Tuple, right: &Tuple, schema: Arc<Schema>) -> Tuple {
        let mut fields = Vec::with_capacity(left.fields.len() + right.fields.len());
        fields.extend(left.fields.iter().cloned());
        fields.extend(right.fields.iter().cloned());
        Tuple {
            schema,
            fields,
            rid: None,
        }
    }
}
