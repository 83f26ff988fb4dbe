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

pub mod schema;

#[cfg(test)]
mod tests;

use crate::catalog::schema::{FieldDef, Schema};
use crate::error::{Error, Result};
use crate::storage::buffer_pool::BufferPool;
use crate::storage::heap_file::HeapFile;
use crate::types::FieldType;
use parking_lot::RwLock;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Catalog {
    catalog_path: PathBuf,
    root_dir: PathBuf,
    pool: Arc<BufferPool>,
    tables: RwLock<Vec<(String, Arc<HeapFile>)>>,
}

impl Catalog {
    pub fn load(
        catalog_path: impl AsRef<Path>,
        root_dir: impl AsRef<Path>,
        pool: Arc<BufferPool>,
    ) -> Result<Catalog> {
        let catalog = Catalog {
            catalog_path: catalog_path.as_ref().to_path_buf(),
            root_dir: root_dir.as_ref().to_path_buf(),
            pool,
            tables: RwLock::new(Vec::new()),
        };
        if catalog.catalog_path.exists() {
            let text = std::fs::read_to_string(&catalog.catalog_path)?;
            for line in text.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let (name, schema) = parse_catalog_line(line)?;
                catalog.attach(&name, Arc::new(schema))?;
            }
        }
        Ok(catalog)
    }

    fn attach(&self, name: &str, schema: Arc<Schema>) -> Result<Arc<HeapFile>> {
        let backing = self.root_dir.join(format!("{name}.dat"));
        let file = HeapFile::open(backing, schema, Arc::clone(&self.pool))?;
        self.tables
            .write()
            .push((name.to_string(), Arc::clone(&file)));
        Ok(file)
    }

    pub fn add_table(&self, name: &str, schema: Schema) -> Result<Arc<HeapFile>> {
        if self.tables.read().iter().any(|(n, _)| n == name) {
            return Err(Error::MalformedData(format!(
                "table {name} already exists"
            )));
        }
        let file = self.attach(name, Arc::new(schema))?;
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.catalog_path)?;
        writeln!(out, "{} ({})", name, file.schema())?;
        Ok(file)
    }

    pub fn table(&self, name: &str) -> Result<Arc<HeapFile>> {
        self.tables
            .read()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, file)| Arc::clone(file))
            .ok_or_else(|| Error::MalformedData(format!("no table named {name} in catalog")))
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, file) in self.tables.read().iter() {
            writeln!(f, "{}({})", name, file.schema())?;
        }
        Ok(())
    }
}

pub fn parse_catalog_line(line: &str) -> Result<(String, Schema)> {
    let open = line
        .find('(')
        .ok_or_else(|| Error::MalformedData(format!("catalog line has no field list: {line}")))?;
    let close = line
        .rfind(')')
        .ok_or_else(|| Error::MalformedData(format!("catalog line is unterminated: {line}")))?;
    if close < open {
        return Err(Error::MalformedData(format!(
            "catalog line is malformed: {line}"
        )));
    }

    let name = line[..open].trim();
    if name.is_empty() {
        return Err(Error::MalformedData(format!(
            "catalog line has no table name: {line}"
        )));
    }

    let mut fields = Vec::new();
    for part in line[open + 1..close].split(',') {
        let part = part.trim();
        let mut tokens = part.split_whitespace();
        let fname = tokens.next().ok_or_else(|| {
            Error::MalformedData(format!("catalog line has an empty field: {line}"))
        })?;
        let ftype = tokens.next().ok_or_else(|| {
            Error::MalformedData(format!("field {fname} has no type in: {line}"))
        })?;
        if tokens.next().is_some() {
            return Err(Error::MalformedData(format!(
                "field {fname} has trailing tokens in: {line}"
            )));
        }
        let ftype = match ftype {
            "int" => FieldType::Int,
            "string" => FieldType::Str,
            other => {
                return Err(Error::MalformedData(format!(
                    "unknown type token {other:?} in: {line}"
                )))
            }
        };
        fields.push(FieldDef::new(fname, ftype));
    }
    if fields.is_empty() {
        return Err(Error::MalformedData(format!(
            "table {name} declares no fields"
        )));
    }

    Ok((name.to_string(), Schema::new(fields)))
}
