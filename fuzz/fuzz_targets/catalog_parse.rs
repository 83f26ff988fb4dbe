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

use heapdb::catalog::parse_catalog_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    // parsing arbitrary lines may fail, but must not panic, and accepted
    // lines must yield a non-empty schema
    if let Ok((name, schema)) = parse_catalog_line(line) {
        assert!(!name.is_empty());
        assert!(!schema.fields.is_empty());
    }
});
