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

pub mod executor;
pub mod expression;
pub mod optimizer;
pub mod subset_iter;
pub mod trie;

#[cfg(test)]
mod tests;

use crate::catalog::schema::Schema;
use crate::error::Result;
use crate::storage::tuple::Tuple;
use crate::tx::TransactionId;
use std::sync::Arc;

pub type TupleStream<'a> = Box<dyn FnMut() -> Result<Option<Tuple>> + 'a>;

pub trait Operator {
    fn descriptor(&self) -> Arc<Schema>;
    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>>;
}
