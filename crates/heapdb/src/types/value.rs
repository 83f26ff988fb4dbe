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

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

pub const STR_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int,
    Str,
}

impl FieldType {
    pub fn byte_len(self) -> usize {
        match self {
            FieldType::Int => 8,
            FieldType::Str => STR_LEN,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => write!(f, "int"),
            FieldType::Str => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Int(i64),
    Str(String),
}

impl Field {
    pub fn ftype(&self) -> FieldType {
        match self {
            Field::Int(_) => FieldType::Int,
            Field::Str(_) => FieldType::Str,
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Field::Int(v) => Ok(*v),
            Field::Str(_) => Err(Error::TypeMismatch("expected an int field".to_string())),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Field::Str(s) => Ok(s),
            Field::Int(_) => Err(Error::TypeMismatch("expected a string field".to_string())),
        }
    }

    pub fn write_to(&self, out: &mut [u8]) -> Result<()> {
        if out.len() != self.ftype().byte_len() {
            return Err(Error::TypeMismatch(format!(
                "field needs {} bytes, slot has {}",
                self.ftype().byte_len(),
                out.len()
            )));
        }
        match self {
            Field::Int(v) => out.copy_from_slice(&v.to_le_bytes()),
            Field::Str(s) => {
                let clipped = clip_to_bytes(s, STR_LEN);
                out[..clipped.len()].copy_from_slice(clipped.as_bytes());
                for b in &mut out[clipped.len()..] {
                    *b = 0;
                }
            }
        }
        Ok(())
    }

    pub fn read_from(ftype: FieldType, raw: &[u8]) -> Result<Field> {
        if raw.len() != ftype.byte_len() {
            return Err(Error::MalformedData(format!(
                "field of type {ftype} needs {} bytes, got {}",
                ftype.byte_len(),
                raw.len()
            )));
        }
        match ftype {
            FieldType::Int => {
                let bytes: [u8; 8] = raw.try_into().expect("int field bytes");
                Ok(Field::Int(i64::from_le_bytes(bytes)))
            }
            FieldType::Str => {
                let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
                let s = std::str::from_utf8(&raw[..end]).map_err(|_| {
                    Error::MalformedData("string field contains invalid utf-8".to_string())
                })?;
                Ok(Field::Str(s.to_string()))
            }
        }
    }

    pub fn compare(&self, other: &Field) -> Result<Ordering> {
        match (self, other) {
            (Field::Int(a), Field::Int(b)) => Ok(a.cmp(b)),
            (Field::Str(a), Field::Str(b)) => Ok(a.cmp(b)),
            _ => Err(Error::IncompatibleTypes(format!(
                "cannot compare {} with {}",
                self.ftype(),
                other.ftype()
            ))),
        }
    }

    pub fn eval_pred(&self, other: &Field, op: BoolOp) -> Result<bool> {
        if let (BoolOp::Like, Field::Str(a), Field::Str(b)) = (op, self, other) {
            return Ok(a.contains(b.as_str()));
        }
        let ord = self.compare(other)?;
        Ok(match op {
            BoolOp::Eq | BoolOp::Like => ord == Ordering::Equal,
            BoolOp::Neq => ord != Ordering::Equal,
            BoolOp::Gt => ord == Ordering::Greater,
            BoolOp::Ge => ord != Ordering::Less,
            BoolOp::Lt => ord == Ordering::Less,
            BoolOp::Le => ord != Ordering::Greater,
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Int(v) => write!(f, "{v}"),
            Field::Str(s) => write!(f, "{s}"),
        }
    }
}

pub(crate) fn clip_to_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
