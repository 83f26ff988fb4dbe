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

use crate::catalog::schema::FieldDef;
use crate::error::{Error, Result};
use crate::storage::tuple::Tuple;
use crate::types::{Field, FieldType};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Field(FieldDef),
    Const(Field),
}

impl Expr {
    pub fn field(name: impl Into<String>, ftype: FieldType) -> Self {
        Expr::Field(FieldDef::new(name, ftype))
    }

    pub fn constant(value: Field) -> Self {
        Expr::Const(value)
    }

    pub fn ftype(&self) -> FieldType {
        match self {
            Expr::Field(def) => def.ftype,
            Expr::Const(value) => value.ftype(),
        }
    }

    pub fn eval(&self, tuple: &Tuple) -> Result<Field> {
        match self {
            Expr::Const(value) => Ok(value.clone()),
            Expr::Field(def) => {
                let idx = tuple.schema.field_index(&def.name).ok_or_else(|| {
                    Error::TypeMismatch(format!("no field named {} in tuple", def.name))
                })?;
                Ok(tuple.fields[idx].clone())
            }
        }
    }
}
