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

pub mod int_histogram;
pub mod string_histogram;
pub mod table_stats;

#[cfg(test)]
mod tests;

pub use int_histogram::{IntHistogram, INT_HIST_BINS};
pub use string_histogram::{StringHistogram, STR_HIST_BINS};
pub use table_stats::{Stats, TableStats, SCAN_COST_PER_PAGE};
