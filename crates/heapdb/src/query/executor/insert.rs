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

use crate::catalog::schema::{FieldDef, Schema};
use crate::error::{Error, Result};
use crate::query::{Operator, TupleStream};
use crate::storage::heap_file::HeapFile;
use crate::storage::tuple::Tuple;
use crate::tx::TransactionId;
use crate::types::{Field, FieldType};
use std::sync::Arc;

fn count_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![FieldDef::new("count", FieldType::Int)]))
}

pub struct InsertOp<'a> {
    file: Arc<HeapFile>,
    child: &'a dyn Operator,
}

impl<'a> InsertOp<'a> {
    pub fn new(file: Arc<HeapFile>, child: &'a dyn Operator) -> Self {
        Self { file, child }
    }
}

impl Operator for InsertOp<'_> {
    fn descriptor(&self) -> Arc<Schema> {
        count_schema()
    }

    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>> {
        let mut child = self.child.iterator(tid)?;
        let mut done = false;
        Ok(Box::new(move || {
            if done {
                return Ok(None);
            }
            let table_schema = self.file.schema();
            let mut count = 0_i64;
            while let Some(tuple) = child()? {
                if tuple.fields.len() != table_schema.fields.len() {
                    return Err(Error::TypeMismatch(
                        "inserted tuple does not have the table's field count".to_string(),
                    ));
                }
                for (idx, (field, def)) in
                    tuple.fields.iter().zip(&table_schema.fields).enumerate()
                {
                    if field.ftype() != def.ftype {
                        return Err(Error::TypeMismatch(format!(
                            "expected {} in inserted field {idx}, got {}",
                            def.ftype,
                            field.ftype()
                        )));
                    }
                }
                self.file.insert_tuple(&tuple, tid)?;
                count += 1;
            }
            done = true;
            Ok(Some(Tuple::new(count_schema(), vec![Field::Int(count)])?))
        }))
    }
}
