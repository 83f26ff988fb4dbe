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

use crate::storage::heap_page::PageKey;
use crate::tx::lock_table::{LockResponse, LockTable};
use crate::tx::{Perm, TransactionId};

fn page(file_id: u32, page_no: usize) -> PageKey {
    PageKey { file_id, page_no }
}

#[test]
fn two_readers_share_a_page() {
    let mut lt = LockTable::new();
    let (t1, t2) = (TransactionId::new(), TransactionId::new());
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Read), LockResponse::Grant);
}

#[test]
fn writers_on_distinct_pages_do_not_interact() {
    let mut lt = LockTable::new();
    let (t1, t2) = (TransactionId::new(), TransactionId::new());
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(1, 0), t2, Perm::Write), LockResponse::Grant);
}

#[test]
fn sole_reader_upgrades_to_writer() {
    let mut lt = LockTable::new();
    let t1 = TransactionId::new();
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.write_locked_pages(t1), vec![page(0, 0)]);
}

#[test]
fn upgrade_is_denied_while_another_reader_holds_the_page() {
    let mut lt = LockTable::new();
    let (t1, t2) = (TransactionId::new(), TransactionId::new());
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Write), LockResponse::Wait);
}

#[test]
fn writer_keeps_reading_without_a_reader_entry() {
    let mut lt = LockTable::new();
    let (t1, t2) = (TransactionId::new(), TransactionId::new());
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);

    // t1 must hold the page as writer only: releasing it frees the page
    // completely for t2
    lt.release_all(t1);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Write), LockResponse::Grant);
}

#[test]
fn write_request_waits_for_reader_then_succeeds_after_release() {
    let mut lt = LockTable::new();
    let (t1, t2) = (TransactionId::new(), TransactionId::new());
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Write), LockResponse::Wait);
    lt.release_all(t1);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Write), LockResponse::Grant);
}

#[test]
fn write_request_waits_for_writer_then_succeeds_after_release() {
    let mut lt = LockTable::new();
    let (t1, t2) = (TransactionId::new(), TransactionId::new());
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Write), LockResponse::Wait);
    lt.release_all(t1);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Write), LockResponse::Grant);
}

#[test]
fn crossed_lock_requests_abort_exactly_one_transaction() {
    let mut lt = LockTable::new();
    let (t1, t2) = (TransactionId::new(), TransactionId::new());
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(1, 0), t2, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(1, 0), t1, Perm::Read), LockResponse::Wait);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Read), LockResponse::Abort);
}

#[test]
fn write_locked_pages_excludes_read_locks() {
    let mut lt = LockTable::new();
    let t1 = TransactionId::new();
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Read), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 1), t1, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.write_locked_pages(t1), vec![page(0, 1)]);
}

#[test]
fn release_clears_wait_edges() {
    let mut lt = LockTable::new();
    let (t1, t2, t3) = (
        TransactionId::new(),
        TransactionId::new(),
        TransactionId::new(),
    );
    assert_eq!(lt.try_lock(page(0, 0), t1, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(0, 0), t2, Perm::Write), LockResponse::Wait);
    lt.release_all(t2);

    // t2 is gone; a request that would have closed a cycle through it now
    // simply waits
    assert_eq!(lt.try_lock(page(1, 0), t3, Perm::Write), LockResponse::Grant);
    assert_eq!(lt.try_lock(page(1, 0), t1, Perm::Write), LockResponse::Wait);
}
