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
use crate::stats::table_stats::{Stats, TableStats, SCAN_COST_PER_PAGE};
use crate::storage::buffer_pool::BufferPool;
use crate::storage::heap_file::HeapFile;
use crate::storage::tuple::Tuple;
use crate::tx::TransactionId;
use crate::types::{BoolOp, Field, FieldType};
use crate::wal::log_file::LogFile;
use std::sync::Arc;
use tempfile::TempDir;

const NAMES: [&str; 3] = ["joe", "sam", "tim"];

fn setup() -> (TempDir, Arc<BufferPool>, Arc<HeapFile>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = Arc::new(LogFile::open(dir.path().join("test.wal")).expect("log"));
    let pool = Arc::new(BufferPool::new(100, log).expect("pool"));
    let schema = Arc::new(Schema::new(vec![
        FieldDef::new("name", FieldType::Str),
        FieldDef::new("age", FieldType::Int),
    ]));
    let file =
        HeapFile::open(dir.path().join("t.dat"), schema, Arc::clone(&pool)).expect("file");

    let tid = TransactionId::new();
    pool.begin_transaction(tid).expect("begin");
    for i in 0..300 {
        let tuple = Tuple::new(
            Arc::clone(file.schema()),
            vec![
                Field::Str(NAMES[i % 3].to_string()),
                Field::Int((i % 30) as i64 + 1),
            ],
        )
        .expect("tuple");
        file.insert_tuple(&tuple, tid).expect("insert");
    }
    pool.commit_transaction(tid).expect("commit");
    (dir, pool, file)
}

#[test]
fn scan_cost_is_pages_times_io_weight() {
    let (_dir, pool, file) = setup();
    let stats = TableStats::compute(&pool, &file).expect("stats");
    assert_eq!(stats.num_tuples(), 300);
    assert_eq!(
        stats.estimate_scan_cost(),
        file.num_pages() as f64 * SCAN_COST_PER_PAGE
    );
}

#[test]
fn cardinality_scales_with_selectivity() {
    let (_dir, pool, file) = setup();
    let stats = TableStats::compute(&pool, &file).expect("stats");
    assert_eq!(stats.estimate_cardinality(0.2), 60);
    assert_eq!(stats.estimate_cardinality(1.0), 300);
    assert_eq!(stats.estimate_cardinality(0.0), 0);
}

#[test]
fn column_selectivities_follow_the_data() {
    let (_dir, pool, file) = setup();
    let stats = TableStats::compute(&pool, &file).expect("stats");

    let eq_age = stats
        .estimate_selectivity("age", BoolOp::Eq, &Field::Int(10))
        .expect("estimate");
    assert!(
        (0.02..=0.05).contains(&eq_age),
        "one of thirty ages, got {eq_age}"
    );

    let le_age = stats
        .estimate_selectivity("age", BoolOp::Le, &Field::Int(15))
        .expect("estimate");
    assert!((0.45..=0.55).contains(&le_age), "half the ages, got {le_age}");

    let ge_age = stats
        .estimate_selectivity("age", BoolOp::Ge, &Field::Int(1))
        .expect("estimate");
    assert!(ge_age > 0.95, "the whole range, got {ge_age}");

    let eq_name = stats
        .estimate_selectivity("name", BoolOp::Eq, &Field::Str("joe".to_string()))
        .expect("estimate");
    assert!(
        (0.25..=0.4).contains(&eq_name),
        "one of three names, got {eq_name}"
    );
}

#[test]
fn selectivity_rejects_bad_arguments() {
    let (_dir, pool, file) = setup();
    let stats = TableStats::compute(&pool, &file).expect("stats");

    assert!(matches!(
        stats.estimate_selectivity("absent", BoolOp::Eq, &Field::Int(1)),
        Err(Error::TypeMismatch(_))
    ));
    assert!(matches!(
        stats.estimate_selectivity("age", BoolOp::Eq, &Field::Str("ten".to_string())),
        Err(Error::TypeMismatch(_))
    ));
}
