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

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("illegal transaction: {0}")]
    IllegalTransaction(String),

    #[error("buffer pool full: {0}")]
    BufferPoolFull(String),

    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("tuple not found: {0}")]
    TupleNotFound(String),

    #[error("incompatible types: {0}")]
    IncompatibleTypes(String),
}

pub type Result<T> = std::result::Result<T, Error>;
