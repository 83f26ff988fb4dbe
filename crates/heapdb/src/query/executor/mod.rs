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

pub mod delete;
pub mod filter;
pub mod insert;
pub mod join;
pub mod limit;
pub mod order_by;
pub mod project;

pub use delete::DeleteOp;
pub use filter::Filter;
pub use insert::InsertOp;
pub use join::EqualityJoin;
pub use limit::Limit;
pub use order_by::OrderBy;
pub use project::Project;
