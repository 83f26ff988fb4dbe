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
use crate::storage::heap_page::{FileId, HeapPage};
use crate::tx::TransactionId;
use crate::wal::log_record::{LogRecord, PageImage};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub struct LogFile {
    path: PathBuf,
    file: Mutex<File>,
    registry: RwLock<FileRegistry>,
}

#[derive(Default)]
struct FileRegistry {
    paths: Vec<PathBuf>,
    ids: HashMap<PathBuf, FileId>,
}

impl LogFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
            registry: RwLock::new(FileRegistry::default()),
        })
    }

    pub fn register_file(&self, backing: &Path) -> FileId {
        let mut registry = self.registry.write();
        if let Some(id) = registry.ids.get(backing) {
            return *id;
        }
        let id = registry.paths.len() as FileId;
        registry.paths.push(backing.to_path_buf());
        registry.ids.insert(backing.to_path_buf(), id);
        id
    }

    pub fn file_path(&self, id: FileId) -> Result<PathBuf> {
        self.registry
            .read()
            .paths
            .get(id as usize)
            .cloned()
            .ok_or_else(|| Error::MalformedData(format!("log refers to unregistered file id {id}")))
    }

    pub fn log_begin(&self, tid: TransactionId) -> Result<u64> {
        self.append(|offset| LogRecord::Begin { tid, offset })
    }

    pub fn log_commit(&self, tid: TransactionId) -> Result<u64> {
        self.append(|offset| LogRecord::Commit { tid, offset })
    }

    pub fn log_abort(&self, tid: TransactionId) -> Result<u64> {
        self.append(|offset| LogRecord::Abort { tid, offset })
    }

    pub fn log_update(
        &self,
        tid: TransactionId,
        before: &HeapPage,
        after: &HeapPage,
    ) -> Result<u64> {
        let before = PageImage::from_page(before)?;
        let after = PageImage::from_page(after)?;
        self.append(move |offset| LogRecord::Update {
            tid,
            before,
            after,
            offset,
        })
    }

    fn append(&self, make: impl FnOnce(u64) -> LogRecord) -> Result<u64> {
        let mut file = self.file.lock();
        let offset = file.seek(SeekFrom::End(0))?;
        let record = make(offset);
        file.write_all(&record.encode())?;
        Ok(offset)
    }

    pub fn force(&self) -> Result<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }

    pub fn len(&self) -> Result<u64> {
        Ok(self.file.lock().metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn forward_iterator(&self) -> Result<LogForwardIter> {
        Ok(LogForwardIter {
            bytes: self.read_all()?,
            pos: 0,
        })
    }

    pub fn reverse_iterator(&self) -> Result<LogReverseIter> {
        let bytes = self.read_all()?;
        let pos = bytes.len();
        Ok(LogReverseIter { bytes, pos })
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct LogForwardIter {
    bytes: Vec<u8>,
    pos: usize,
}

impl LogForwardIter {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<LogRecord>> {
        if self.pos >= self.bytes.len() {
            return Ok(None);
        }
        let (record, end) = LogRecord::decode_at(&self.bytes, self.pos)?;
        self.pos = end;
        Ok(Some(record))
    }
}

pub struct LogReverseIter {
    bytes: Vec<u8>,
    pos: usize,
}

impl LogReverseIter {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<LogRecord>> {
        if self.pos == 0 {
            return Ok(None);
        }
        if self.pos < 8 {
            return Err(Error::MalformedData(
                "log tail is shorter than a record trailer".to_string(),
            ));
        }
        let trailer: [u8; 8] = self.bytes[self.pos - 8..self.pos]
            .try_into()
            .expect("trailer bytes");
        let start = u64::from_le_bytes(trailer) as usize;
        if start >= self.pos {
            return Err(Error::MalformedData(
                "log record trailer points past itself".to_string(),
            ));
        }
        let (record, end) = LogRecord::decode_at(&self.bytes, start)?;
        if end != self.pos {
            return Err(Error::MalformedData(
                "log record length disagrees with its trailer".to_string(),
            ));
        }
        self.pos = start;
        Ok(Some(record))
    }
}
