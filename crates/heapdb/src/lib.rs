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

pub mod catalog;
pub mod error;
pub mod query;
pub mod stats;
pub mod storage;
pub mod tx;
pub mod types;
pub mod wal;

pub use error::{Error, Result};

use crate::catalog::Catalog;
use crate::query::optimizer::{self, JoinNode};
use crate::storage::buffer_pool::BufferPool;
use crate::wal::log_file::LogFile;
use crate::wal::recovery;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct DatabaseOptions {
    pub buffer_pool_pages: usize,
    pub enable_join_optimization: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            buffer_pool_pages: 256,
            enable_join_optimization: true,
        }
    }
}

pub struct Database {
    catalog: Catalog,
    pool: Arc<BufferPool>,
    log: Arc<LogFile>,
    options: DatabaseOptions,
}

impl Database {
    pub fn open(
        root_dir: impl AsRef<Path>,
        catalog_file: &str,
        options: DatabaseOptions,
    ) -> Result<Database> {
        let root_dir = root_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&root_dir)?;

        let log = Arc::new(LogFile::open(root_dir.join("heapdb.wal"))?);
        let pool = Arc::new(BufferPool::new(options.buffer_pool_pages, Arc::clone(&log))?);
        // loading the catalog registers every backing file with the log, in
        // catalog order, before recovery resolves file ids
        let catalog = Catalog::load(root_dir.join(catalog_file), &root_dir, Arc::clone(&pool))?;
        recovery::recover(&log)?;

        Ok(Database {
            catalog,
            pool,
            log,
            options,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    pub fn log(&self) -> &Arc<LogFile> {
        &self.log
    }

    pub fn options(&self) -> DatabaseOptions {
        self.options
    }

    pub fn order_joins(&self, joins: &[JoinNode]) -> Result<Vec<JoinNode>> {
        if !self.options.enable_join_optimization {
            return Ok(joins.to_vec());
        }
        optimizer::order_joins(joins)
    }
}
