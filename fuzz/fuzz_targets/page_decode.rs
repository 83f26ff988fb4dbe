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

#![no_main]

use heapdb::catalog::schema::{FieldDef, Schema};
use heapdb::storage::heap_page::{HeapPage, PAGE_SIZE};
use heapdb::types::FieldType;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

// Arbitrary bytes either decode into a page that re-encodes losslessly or
// are rejected; the decoder must never panic.
fuzz_target!(|data: &[u8]| {
    let schema = Arc::new(Schema::new(vec![
        FieldDef::new("name", FieldType::Str),
        FieldDef::new("age", FieldType::Int),
    ]));

    let mut raw = vec![0_u8; PAGE_SIZE];
    let n = data.len().min(PAGE_SIZE);
    raw[..n].copy_from_slice(&data[..n]);

    if let Ok(page) = HeapPage::from_bytes(Arc::clone(&schema), 0, 0, &raw) {
        let bytes = page.to_bytes().expect("decoded page re-encodes");
        let again = HeapPage::from_bytes(schema, 0, 0, &bytes).expect("round trip");
        assert_eq!(again.num_used(), page.num_used());
    }
});
