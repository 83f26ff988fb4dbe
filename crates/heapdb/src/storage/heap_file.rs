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
use crate::query::{Operator, TupleStream};
use crate::storage::buffer_pool::BufferPool;
use crate::storage::heap_page::{FileId, HeapPage, PageKey, PAGE_SIZE};
use crate::storage::tuple::Tuple;
use crate::tx::{Perm, TransactionId};
use crate::types::{value, Field, FieldType, STR_LEN};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::BufRead;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct HeapFile {
    schema: Arc<Schema>,
    path: PathBuf,
    file_id: FileId,
    pool: Arc<BufferPool>,
    state: Mutex<FileState>,
}

struct FileState {
    num_pages: usize,
    // advisory hint only; callers tolerate it being stale
    last_empty_page: Option<usize>,
}

impl HeapFile {
    pub fn open(
        path: impl AsRef<Path>,
        schema: Arc<Schema>,
        pool: Arc<BufferPool>,
    ) -> Result<Arc<Self>> {
        let path = path.as_ref().to_path_buf();
        if HeapPage::slots_per_page(&schema) == 0 {
            return Err(Error::TypeMismatch(format!(
                "tuples of {} bytes do not fit in a {PAGE_SIZE}-byte page",
                schema.tuple_size()
            )));
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        let num_pages = file.metadata()?.len() as usize / PAGE_SIZE;
        let file_id = pool.log().register_file(&path);
        Ok(Arc::new(Self {
            schema,
            path,
            file_id,
            pool,
            state: Mutex::new(FileState {
                num_pages,
                last_empty_page: None,
            }),
        }))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn num_pages(&self) -> usize {
        self.state.lock().num_pages
    }

    pub fn page_key(&self, page_no: usize) -> PageKey {
        PageKey {
            file_id: self.file_id,
            page_no,
        }
    }

    pub fn read_page(&self, page_no: usize) -> Result<HeapPage> {
        let file = OpenOptions::new().read(true).open(&self.path)?;
        let mut buf = vec![0_u8; PAGE_SIZE];
        file.read_exact_at(&mut buf, (page_no * PAGE_SIZE) as u64)?;
        HeapPage::from_bytes(Arc::clone(&self.schema), self.file_id, page_no, &buf)
    }

    pub fn flush_page(&self, page: &HeapPage) -> Result<()> {
        write_page_bytes(&self.path, page.page_no(), &page.to_bytes()?)
    }

    pub fn insert_tuple(&self, tuple: &Tuple, tid: TransactionId) -> Result<()> {
        self.check_shape(tuple)?;

        let (start, end) = {
            let state = self.state.lock();
            (state.last_empty_page.unwrap_or(0), state.num_pages)
        };

        for page_no in start..end {
            let page = self.pool.get_page(self, page_no, tid, Perm::Read)?;
            if page.lock().num_empty() == 0 {
                continue;
            }
            let page = self.pool.get_page(self, page_no, tid, Perm::Write)?;
            let mut guard = page.lock();
            if guard.insert(tuple).is_some() {
                guard.set_dirty(tid, true);
                self.state.lock().last_empty_page = Some(page_no);
                return Ok(());
            }
        }

        // no page had room: lengthen the backing file with an empty page,
        // then insert through the buffer pool as usual
        let page_no = {
            let mut state = self.state.lock();
            let page = HeapPage::new(Arc::clone(&self.schema), self.file_id, state.num_pages);
            self.flush_page(&page)?;
            let page_no = state.num_pages;
            state.num_pages += 1;
            state.last_empty_page = Some(page_no);
            page_no
        };

        let page = self.pool.get_page(self, page_no, tid, Perm::Write)?;
        let mut guard = page.lock();
        match guard.insert(tuple) {
            Some(_) => {
                guard.set_dirty(tid, true);
                Ok(())
            }
            None => Err(Error::MalformedData(format!(
                "freshly extended page {page_no} rejected an insert"
            ))),
        }
    }

    pub fn delete_tuple(&self, tuple: &Tuple, tid: TransactionId) -> Result<()> {
        let rid = tuple
            .rid
            .ok_or_else(|| Error::TupleNotFound("tuple has no record id".to_string()))?;
        let num_pages = self.num_pages();
        if rid.page_no >= num_pages {
            return Err(Error::TupleNotFound(format!(
                "record id names page {} of a {num_pages}-page file",
                rid.page_no
            )));
        }

        let page = self.pool.get_page(self, rid.page_no, tid, Perm::Write)?;
        let mut guard = page.lock();
        guard.delete(rid)?;
        guard.set_dirty(tid, true);
        drop(guard);

        let mut state = self.state.lock();
        if state.last_empty_page.map_or(true, |p| rid.page_no < p) {
            state.last_empty_page = Some(rid.page_no);
        }
        Ok(())
    }

    pub fn load_from_csv(
        &self,
        reader: impl BufRead,
        has_header: bool,
        sep: char,
        skip_last_field: bool,
    ) -> Result<()> {
        let tid = TransactionId::new();
        self.pool.begin_transaction(tid)?;
        match self.load_rows(reader, has_header, sep, skip_last_field, tid) {
            Ok(()) => self.pool.commit_transaction(tid),
            Err(err) => {
                let _ = self.pool.abort_transaction(tid);
                Err(err)
            }
        }
    }

    fn load_rows(
        &self,
        reader: impl BufRead,
        has_header: bool,
        sep: char,
        skip_last_field: bool,
        tid: TransactionId,
    ) -> Result<()> {
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if line_no == 0 && has_header {
                continue;
            }
            let mut raw_fields: Vec<&str> = line.split(sep).collect();
            if skip_last_field {
                raw_fields.pop();
            }
            if raw_fields.len() != self.schema.fields.len() {
                return Err(Error::MalformedData(format!(
                    "line {}: expected {} fields, got {}",
                    line_no + 1,
                    self.schema.fields.len(),
                    raw_fields.len()
                )));
            }

            let mut fields = Vec::with_capacity(raw_fields.len());
            for (raw, def) in raw_fields.iter().zip(&self.schema.fields) {
                fields.push(match def.ftype {
                    FieldType::Int => {
                        let raw = raw.trim();
                        let parsed = raw
                            .parse::<i64>()
                            .or_else(|_| raw.parse::<f64>().map(|f| f as i64))
                            .map_err(|_| {
                                Error::TypeMismatch(format!(
                                    "line {}: cannot parse {raw:?} as int",
                                    line_no + 1
                                ))
                            })?;
                        Field::Int(parsed)
                    }
                    FieldType::Str => Field::Str(value::clip_to_bytes(raw, STR_LEN).to_string()),
                });
            }

            let tuple = Tuple::new(Arc::clone(&self.schema), fields)?;
            self.insert_tuple(&tuple, tid)?;
        }
        Ok(())
    }

    fn check_shape(&self, tuple: &Tuple) -> Result<()> {
        if tuple.fields.len() != self.schema.fields.len() {
            return Err(Error::TypeMismatch(format!(
                "tuple has {} fields, table declares {}",
                tuple.fields.len(),
                self.schema.fields.len()
            )));
        }
        for (field, def) in tuple.fields.iter().zip(&self.schema.fields) {
            if field.ftype() != def.ftype {
                return Err(Error::TypeMismatch(format!(
                    "column {} is {}, tuple holds {}",
                    def.name,
                    def.ftype,
                    field.ftype()
                )));
            }
        }
        Ok(())
    }
}

impl Operator for HeapFile {
    fn descriptor(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn iterator(&self, tid: TransactionId) -> Result<TupleStream<'_>> {
        let num_pages = self.num_pages();
        let mut page_no = 0_usize;
        let mut buffered: Vec<Tuple> = Vec::new();
        let mut cursor = 0_usize;

        Ok(Box::new(move || loop {
            if cursor < buffered.len() {
                let tuple = buffered[cursor].clone();
                cursor += 1;
                return Ok(Some(tuple));
            }
            if page_no >= num_pages {
                return Ok(None);
            }
            let page = self.pool.get_page(self, page_no, tid, Perm::Read)?;
            let guard = page.lock();
            buffered = guard.tuple_iter().cloned().collect();
            cursor = 0;
            page_no += 1;
        }))
    }
}

pub(crate) fn write_page_bytes(path: &Path, page_no: usize, bytes: &[u8]) -> Result<()> {
    let file = OpenOptions::new().write(true).create(true).open(path)?;
    file.write_all_at(bytes, (page_no * PAGE_SIZE) as u64)?;
    Ok(())
}
