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
use crate::error::Error;
use crate::storage::buffer_pool::BufferPool;
use crate::storage::heap_file::HeapFile;
use crate::storage::tuple::Tuple;
use crate::tx::{Perm, TransactionId};
use crate::types::{Field, FieldType};
use crate::wal::log_file::LogFile;
use crate::wal::log_record::LogRecord;
use std::sync::Arc;
use tempfile::TempDir;

fn int_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![FieldDef::new("f", FieldType::Int)]))
}

fn setup(pool_pages: usize) -> (TempDir, Arc<BufferPool>, Arc<HeapFile>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = Arc::new(LogFile::open(dir.path().join("test.wal")).expect("log"));
    let pool = Arc::new(BufferPool::new(pool_pages, log).expect("pool"));
    let file =
        HeapFile::open(dir.path().join("t.dat"), int_schema(), Arc::clone(&pool)).expect("file");
    (dir, pool, file)
}

fn int_row(file: &HeapFile, v: i64) -> Tuple {
    Tuple::new(Arc::clone(file.schema()), vec![Field::Int(v)]).expect("tuple")
}

fn fill_pages(file: &HeapFile, tid: TransactionId, pages: usize, value: i64) {
    while file.num_pages() < pages {
        file.insert_tuple(&int_row(file, value), tid).expect("insert");
    }
}

#[test]
fn zero_capacity_pool_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = Arc::new(LogFile::open(dir.path().join("test.wal")).expect("log"));
    assert!(matches!(
        BufferPool::new(0, log),
        Err(Error::BufferPoolFull(_))
    ));
}

#[test]
fn beginning_the_same_transaction_twice_fails() {
    let (_dir, pool, _file) = setup(4);
    let tid = TransactionId::new();
    pool.begin_transaction(tid).expect("begin");
    assert!(matches!(
        pool.begin_transaction(tid),
        Err(Error::IllegalTransaction(_))
    ));
}

#[test]
fn page_access_requires_a_running_transaction() {
    let (_dir, pool, file) = setup(4);
    let tid = TransactionId::new();
    assert!(matches!(
        pool.get_page(&file, 0, tid, Perm::Read),
        Err(Error::IllegalTransaction(_))
    ));
}

#[test]
fn aborting_an_unknown_transaction_fails() {
    let (_dir, pool, _file) = setup(4);
    assert!(matches!(
        pool.abort_transaction(TransactionId::new()),
        Err(Error::IllegalTransaction(_))
    ));
}

#[test]
fn commit_does_not_force_data_pages_to_disk() {
    let (_dir, pool, file) = setup(4);
    let tid = TransactionId::new();
    pool.begin_transaction(tid).expect("begin");
    file.insert_tuple(&int_row(&file, 7), tid).expect("insert");
    pool.commit_transaction(tid).expect("commit");

    // NO-FORCE: the backing file still holds the empty page written when the
    // file was extended; the row lives in the cache and the log only
    let on_disk = file.read_page(0).expect("read page");
    assert_eq!(on_disk.num_used(), 0);

    pool.flush_all_pages().expect("flush");
    let flushed = file.read_page(0).expect("read page");
    assert_eq!(flushed.num_used(), 1);
}

#[test]
fn evicting_a_dirty_page_writes_an_update_record() {
    let (_dir, pool, file) = setup(1);

    // two committed pages of ones
    let tid1 = TransactionId::new();
    pool.begin_transaction(tid1).expect("begin tid1");
    fill_pages(&file, tid1, 2, 1);
    pool.commit_transaction(tid1).expect("commit tid1");

    // dirty the first page without inserting anything
    let tid2 = TransactionId::new();
    pool.begin_transaction(tid2).expect("begin tid2");
    let page = pool.get_page(&file, 0, tid2, Perm::Write).expect("page 0");
    page.lock().set_dirty(tid2, true);

    // reading the second page forces the dirty first page out
    let tid3 = TransactionId::new();
    pool.begin_transaction(tid3).expect("begin tid3");
    pool.get_page(&file, 1, tid3, Perm::Read).expect("page 1");

    let mut updates_tid1 = 0;
    let mut updates_tid2 = 0;
    let mut iter = pool.log().forward_iterator().expect("iterator");
    while let Some(record) = iter.next().expect("record") {
        if let LogRecord::Update { tid, .. } = record {
            if tid == tid1 {
                updates_tid1 += 1;
            } else if tid == tid2 {
                updates_tid2 += 1;
            }
        }
    }
    assert_eq!(
        (updates_tid1, updates_tid2),
        (2, 1),
        "expected two updates for tid1 (one evicted, one at commit) and one eviction update for tid2"
    );
}

#[test]
fn aborted_transaction_changes_are_invisible() {
    let (_dir, pool, file) = setup(4);

    // fill two pages completely so the aborting transaction lands on a page
    // of its own
    let per_page = crate::storage::heap_page::HeapPage::slots_per_page(file.schema());
    let committed = per_page * 2;
    let tid1 = TransactionId::new();
    pool.begin_transaction(tid1).expect("begin");
    for _ in 0..committed {
        file.insert_tuple(&int_row(&file, 1), tid1).expect("insert");
    }
    assert_eq!(file.num_pages(), 2);
    pool.commit_transaction(tid1).expect("commit");

    let tid2 = TransactionId::new();
    pool.begin_transaction(tid2).expect("begin");
    file.insert_tuple(&int_row(&file, 2), tid2).expect("insert");
    assert_eq!(file.num_pages(), 3);
    pool.abort_transaction(tid2).expect("abort");

    let tid3 = TransactionId::new();
    pool.begin_transaction(tid3).expect("begin");
    use crate::query::Operator;
    let mut iter = file.iterator(tid3).expect("iterator");
    let mut values = Vec::new();
    while let Some(tuple) = iter().expect("tuple") {
        values.push(tuple.fields[0].as_int().expect("int"));
    }
    assert_eq!(values.len(), committed);
    assert!(values.iter().all(|v| *v == 1));
    pool.commit_transaction(tid3).expect("commit");
}
