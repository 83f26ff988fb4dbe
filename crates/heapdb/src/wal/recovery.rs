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

use crate::error::Result;
use crate::storage::heap_file::write_page_bytes;
use crate::tx::TransactionId;
use crate::wal::log_file::LogFile;
use crate::wal::log_record::LogRecord;
use std::collections::HashSet;
use tracing::debug;

pub fn recover(log: &LogFile) -> Result<()> {
    let mut completed: HashSet<TransactionId> = HashSet::new();
    let mut losers: HashSet<TransactionId> = HashSet::new();

    let mut redone = 0_usize;
    let mut iter = log.forward_iterator()?;
    while let Some(record) = iter.next()? {
        match record {
            LogRecord::Commit { tid, .. } | LogRecord::Abort { tid, .. } => {
                completed.insert(tid);
                losers.remove(&tid);
            }
            LogRecord::Update { tid, after, .. } => {
                if !completed.contains(&tid) {
                    let path = log.file_path(after.file_id)?;
                    write_page_bytes(&path, after.page_no, &after.data)?;
                    losers.insert(tid);
                    redone += 1;
                }
            }
            LogRecord::Begin { .. } => {}
        }
    }

    let mut undone = 0_usize;
    let mut iter = log.reverse_iterator()?;
    while let Some(record) = iter.next()? {
        let LogRecord::Update { tid, before, .. } = record else {
            continue;
        };
        if losers.contains(&tid) {
            let path = log.file_path(before.file_id)?;
            write_page_bytes(&path, before.page_no, &before.data)?;
            undone += 1;
        }
    }

    if redone > 0 || undone > 0 {
        debug!(redone, undone, losers = losers.len(), "recovery replayed log");
    }
    Ok(())
}
