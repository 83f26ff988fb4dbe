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
use crate::storage::heap_page::{FileId, HeapPage, PAGE_SIZE};
use crate::tx::TransactionId;

const TYPE_BEGIN: u8 = 1;
const TYPE_COMMIT: u8 = 2;
const TYPE_ABORT: u8 = 3;
const TYPE_UPDATE: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub file_id: FileId,
    pub page_no: usize,
    pub data: Vec<u8>,
}

impl PageImage {
    pub fn from_page(page: &HeapPage) -> Result<Self> {
        Ok(Self {
            file_id: page.file_id(),
            page_no: page.page_no(),
            data: page.to_bytes()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Begin {
        tid: TransactionId,
        offset: u64,
    },
    Commit {
        tid: TransactionId,
        offset: u64,
    },
    Abort {
        tid: TransactionId,
        offset: u64,
    },
    Update {
        tid: TransactionId,
        before: PageImage,
        after: PageImage,
        offset: u64,
    },
}

impl LogRecord {
    pub fn tid(&self) -> TransactionId {
        match self {
            Self::Begin { tid, .. }
            | Self::Commit { tid, .. }
            | Self::Abort { tid, .. }
            | Self::Update { tid, .. } => *tid,
        }
    }

    pub fn offset(&self) -> u64 {
        match self {
            Self::Begin { offset, .. }
            | Self::Commit { offset, .. }
            | Self::Abort { offset, .. }
            | Self::Update { offset, .. } => *offset,
        }
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Self::Begin { tid, .. } => {
                out.push(TYPE_BEGIN);
                out.extend_from_slice(&tid.raw().to_le_bytes());
            }
            Self::Commit { tid, .. } => {
                out.push(TYPE_COMMIT);
                out.extend_from_slice(&tid.raw().to_le_bytes());
            }
            Self::Abort { tid, .. } => {
                out.push(TYPE_ABORT);
                out.extend_from_slice(&tid.raw().to_le_bytes());
            }
            Self::Update {
                tid, before, after, ..
            } => {
                out.push(TYPE_UPDATE);
                out.extend_from_slice(&tid.raw().to_le_bytes());
                encode_image(&mut out, before);
                encode_image(&mut out, after);
            }
        }
        out.extend_from_slice(&self.offset().to_le_bytes());
        out
    }

    pub(crate) fn decode_at(bytes: &[u8], start: usize) -> Result<(LogRecord, usize)> {
        let mut cursor = start;
        let tag = take_u8(bytes, &mut cursor)?;
        let tid = TransactionId::from_raw(take_u64(bytes, &mut cursor)?);

        let record = match tag {
            TYPE_BEGIN => {
                let offset = take_u64(bytes, &mut cursor)?;
                LogRecord::Begin { tid, offset }
            }
            TYPE_COMMIT => {
                let offset = take_u64(bytes, &mut cursor)?;
                LogRecord::Commit { tid, offset }
            }
            TYPE_ABORT => {
                let offset = take_u64(bytes, &mut cursor)?;
                LogRecord::Abort { tid, offset }
            }
            TYPE_UPDATE => {
                let before = decode_image(bytes, &mut cursor)?;
                let after = decode_image(bytes, &mut cursor)?;
                let offset = take_u64(bytes, &mut cursor)?;
                LogRecord::Update {
                    tid,
                    before,
                    after,
                    offset,
                }
            }
            other => {
                return Err(Error::MalformedData(format!(
                    "unknown log record tag {other}"
                )))
            }
        };

        if record.offset() != start as u64 {
            return Err(Error::MalformedData(format!(
                "log record trailer says offset {}, record starts at {start}",
                record.offset()
            )));
        }
        Ok((record, cursor))
    }
}

fn encode_image(out: &mut Vec<u8>, image: &PageImage) {
    out.extend_from_slice(&image.file_id.to_le_bytes());
    out.extend_from_slice(&(image.page_no as u64).to_le_bytes());
    out.extend_from_slice(&image.data);
}

fn decode_image(bytes: &[u8], cursor: &mut usize) -> Result<PageImage> {
    let file_id = take_u32(bytes, cursor)?;
    let page_no = take_u64(bytes, cursor)? as usize;
    if *cursor + PAGE_SIZE > bytes.len() {
        return Err(Error::MalformedData(
            "truncated page image in log record".to_string(),
        ));
    }
    let data = bytes[*cursor..*cursor + PAGE_SIZE].to_vec();
    *cursor += PAGE_SIZE;
    Ok(PageImage {
        file_id,
        page_no,
        data,
    })
}

fn take_u8(buf: &[u8], cursor: &mut usize) -> Result<u8> {
    if *cursor + 1 > buf.len() {
        return Err(Error::MalformedData(
            "truncated u8 in log record".to_string(),
        ));
    }
    let v = buf[*cursor];
    *cursor += 1;
    Ok(v)
}

fn take_u32(buf: &[u8], cursor: &mut usize) -> Result<u32> {
    if *cursor + 4 > buf.len() {
        return Err(Error::MalformedData(
            "truncated u32 in log record".to_string(),
        ));
    }
    let v = u32::from_le_bytes(buf[*cursor..*cursor + 4].try_into().expect("u32 bytes"));
    *cursor += 4;
    Ok(v)
}

fn take_u64(buf: &[u8], cursor: &mut usize) -> Result<u64> {
    if *cursor + 8 > buf.len() {
        return Err(Error::MalformedData(
            "truncated u64 in log record".to_string(),
        ));
    }
    let v = u64::from_le_bytes(buf[*cursor..*cursor + 8].try_into().expect("u64 bytes"));
    *cursor += 8;
    Ok(v)
}
