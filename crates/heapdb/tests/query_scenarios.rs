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

use heapdb::query::Operator;
use heapdb::storage::tuple::Tuple;
use heapdb::tx::TransactionId;
use heapdb::types::Field;
use heapdb::{Database, DatabaseOptions};
use std::sync::Arc;

fn open_db(dir: &std::path::Path, pool_pages: usize) -> Database {
    std::fs::write(dir.join("catalog.txt"), "t (name string, age int)\n").expect("write catalog");
    Database::open(
        dir,
        "catalog.txt",
        DatabaseOptions {
            buffer_pool_pages: pool_pages,
            ..DatabaseOptions::default()
        },
    )
    .expect("open database")
}

#[test]
fn insert_iterate_fold_sums_the_ages() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(dir.path(), 16);
    let table = db.catalog().table("t").expect("table t");

    let tid = TransactionId::new();
    db.pool().begin_transaction(tid).expect("begin");
    for (name, age) in [("sam", 25), ("joe", 32), ("tim", 41)] {
        let tuple = Tuple::new(
            Arc::clone(table.schema()),
            vec![Field::Str(name.to_string()), Field::Int(age)],
        )
        .expect("tuple");
        table.insert_tuple(&tuple, tid).expect("insert");
    }

    let mut iter = table.iterator(tid).expect("iterator");
    let mut sum = 0_i64;
    while let Some(tuple) = iter().expect("tuple") {
        sum += tuple.fields[1].as_int().expect("age");
    }
    assert_eq!(sum, 25 + 32 + 41);
    db.pool().commit_transaction(tid).expect("commit");
}

#[test]
fn csv_loaded_table_folds_to_the_same_sum() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = open_db(dir.path(), 16);
    let table = db.catalog().table("t").expect("table t");

    let csv = "name,age\nsam,25\njoe,32\ntim,41\nann,13\n";
    table
        .load_from_csv(csv.as_bytes(), true, ',', false)
        .expect("load csv");

    let tid = TransactionId::new();
    db.pool().begin_transaction(tid).expect("begin");
    let mut iter = table.iterator(tid).expect("iterator");
    let mut sum = 0_i64;
    let mut count = 0;
    while let Some(tuple) = iter().expect("tuple") {
        sum += tuple.fields[1].as_int().expect("age");
        count += 1;
    }
    assert_eq!(count, 4);
    assert_eq!(sum, 111);
    db.pool().commit_transaction(tid).expect("commit");
}

#[test]
fn disabling_join_optimization_keeps_the_input_order() {
    use heapdb::query::optimizer::{JoinNode, TableInfo};
    use heapdb::stats::Stats;
    use heapdb::types::BoolOp;

    struct Fixed(usize, f64);
    impl Stats for Fixed {
        fn estimate_scan_cost(&self) -> f64 {
            self.1
        }
        fn estimate_cardinality(&self, sel: f64) -> usize {
            (self.0 as f64 * sel) as usize
        }
        fn estimate_selectivity(
            &self,
            _field: &str,
            _op: BoolOp,
            _value: &Field,
        ) -> heapdb::Result<f64> {
            Ok(1.0)
        }
    }

    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("catalog.txt"), "t (name string, age int)\n")
        .expect("write catalog");
    let db = Database::open(
        dir.path(),
        "catalog.txt",
        DatabaseOptions {
            buffer_pool_pages: 4,
            enable_join_optimization: false,
        },
    )
    .expect("open database");

    let big = TableInfo::new("big", Arc::new(Fixed(100_000, 100_000.0)), 1.0);
    let small = TableInfo::new("small", Arc::new(Fixed(10, 10.0)), 1.0);
    let joins = vec![JoinNode::new(big.clone(), "x", small.clone(), "x")];

    let ordered = db.order_joins(&joins).expect("order joins");
    assert_eq!(ordered.len(), 1);
    assert_eq!(ordered[0].left.name, "big");
    assert_eq!(ordered[0].right.name, "small");
}
