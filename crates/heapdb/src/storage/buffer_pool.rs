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

use crate::error::{Error, Result};
use crate::storage::heap_file::{write_page_bytes, HeapFile};
use crate::storage::heap_page::{HeapPage, PageKey};
use crate::tx::lock_table::{LockResponse, LockTable};
use crate::tx::{Perm, TransactionId};
use crate::wal::log_file::LogFile;
use crate::wal::log_record::LogRecord;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(2);

pub struct BufferPool {
    max_pages: usize,
    log: Arc<LogFile>,
    inner: Mutex<PoolInner>,
}

struct PoolInner {
    pages: HashMap<PageKey, Arc<Mutex<HeapPage>>>,
    running: HashSet<TransactionId>,
    lock_table: LockTable,
}

impl BufferPool {
    pub fn new(max_pages: usize, log: Arc<LogFile>) -> Result<Self> {
        if max_pages == 0 {
            return Err(Error::BufferPoolFull(
                "buffer pool needs at least one page".to_string(),
            ));
        }
        Ok(Self {
            max_pages,
            log,
            inner: Mutex::new(PoolInner {
                pages: HashMap::new(),
                running: HashSet::new(),
                lock_table: LockTable::new(),
            }),
        })
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn log(&self) -> &Arc<LogFile> {
        &self.log
    }

    pub fn is_running(&self, tid: TransactionId) -> bool {
        self.inner.lock().running.contains(&tid)
    }

    pub fn begin_transaction(&self, tid: TransactionId) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.running.contains(&tid) {
            return Err(Error::IllegalTransaction(format!(
                "transaction {tid} is already running"
            )));
        }
        self.log.log_begin(tid)?;
        self.log.force()?;
        inner.running.insert(tid);
        Ok(())
    }

    pub fn get_page(
        &self,
        file: &HeapFile,
        page_no: usize,
        tid: TransactionId,
        perm: Perm,
    ) -> Result<Arc<Mutex<HeapPage>>> {
        let key = file.page_key(page_no);
        loop {
            {
                let mut inner = self.inner.lock();
                if !inner.running.contains(&tid) {
                    return Err(Error::IllegalTransaction(format!(
                        "transaction {tid} is not running"
                    )));
                }

                let page = match inner.pages.get(&key) {
                    Some(page) => Arc::clone(page),
                    None => {
                        let loaded = file.read_page(page_no)?;
                        self.evict_if_full(&mut inner)?;
                        let page = Arc::new(Mutex::new(loaded));
                        inner.pages.insert(key, Arc::clone(&page));
                        page
                    }
                };

                match inner.lock_table.try_lock(key, tid, perm) {
                    LockResponse::Grant => return Ok(page),
                    LockResponse::Wait => {}
                    LockResponse::Abort => {
                        drop(inner);
                        warn!(%tid, ?key, "aborting deadlock victim");
                        self.abort_transaction(tid)?;
                        return Err(Error::IllegalTransaction(format!(
                            "transaction {tid} was aborted to break a deadlock"
                        )));
                    }
                }
            }
            std::thread::sleep(LOCK_RETRY_INTERVAL);
        }
    }

    pub fn commit_transaction(&self, tid: TransactionId) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.running.contains(&tid) {
            return Err(Error::IllegalTransaction(format!(
                "transaction {tid} is not running"
            )));
        }

        for key in inner.lock_table.write_locked_pages(tid) {
            let Some(page) = inner.pages.get(&key) else {
                // already evicted; its update record was written then
                continue;
            };
            let mut guard = page.lock();
            if !guard.is_dirty() {
                continue;
            }
            guard.set_dirty(tid, false);
            self.log.log_update(tid, guard.before_image(), &guard)?;
            guard.set_before_image();
        }

        self.log.log_commit(tid)?;
        self.log.force()?;
        inner.lock_table.release_all(tid);
        inner.running.remove(&tid);
        Ok(())
    }

    pub fn abort_transaction(&self, tid: TransactionId) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.running.contains(&tid) {
            return Err(Error::IllegalTransaction(format!(
                "transaction {tid} is not running"
            )));
        }

        self.log.log_abort(tid)?;
        self.log.force()?;
        self.rollback(&mut inner, tid)?;

        for key in inner.lock_table.write_locked_pages(tid) {
            inner.pages.remove(&key);
        }
        inner.lock_table.release_all(tid);
        inner.running.remove(&tid);
        debug!(%tid, "aborted transaction");
        Ok(())
    }

    pub fn flush_all_pages(&self) -> Result<()> {
        let inner = self.inner.lock();
        for page in inner.pages.values() {
            let guard = page.lock();
            let path = self.log.file_path(guard.file_id())?;
            write_page_bytes(&path, guard.page_no(), &guard.to_bytes()?)?;
        }
        Ok(())
    }

    fn evict_if_full(&self, inner: &mut PoolInner) -> Result<()> {
        if inner.pages.len() < self.max_pages {
            return Ok(());
        }

        let clean = inner
            .pages
            .iter()
            .find(|(_, page)| !page.lock().is_dirty())
            .map(|(key, _)| *key);
        if let Some(key) = clean {
            inner.pages.remove(&key);
            debug!(?key, "evicted clean page");
            return Ok(());
        }

        let Some((key, page)) = inner
            .pages
            .iter()
            .next()
            .map(|(key, page)| (*key, Arc::clone(page)))
        else {
            return Err(Error::BufferPoolFull(
                "no resident page can be evicted".to_string(),
            ));
        };

        {
            let guard = page.lock();
            let dirtier = guard.last_dirtier().ok_or_else(|| {
                Error::IllegalTransaction("dirty page has no recorded writer".to_string())
            })?;
            self.log.log_update(dirtier, guard.before_image(), &guard)?;
            self.log.force()?;
            let path = self.log.file_path(guard.file_id())?;
            write_page_bytes(&path, guard.page_no(), &guard.to_bytes()?)?;
            debug!(?key, %dirtier, "evicted dirty page after logging its update");
        }
        inner.pages.remove(&key);
        Ok(())
    }

    fn rollback(&self, inner: &mut PoolInner, tid: TransactionId) -> Result<()> {
        let mut iter = self.log.reverse_iterator()?;
        let mut undone = 0_usize;
        while let Some(record) = iter.next()? {
            let LogRecord::Update {
                tid: owner, before, ..
            } = record
            else {
                continue;
            };
            if owner != tid {
                continue;
            }
            let path = self.log.file_path(before.file_id)?;
            write_page_bytes(&path, before.page_no, &before.data)?;
            inner
                .pages
                .retain(|_, page| page.lock().last_dirtier() != Some(tid));
            undone += 1;
        }
        if undone > 0 {
            debug!(%tid, undone, "rolled back flushed updates");
        }
        Ok(())
    }
}
