// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary model file I/O.
//!
//! A legacy variant of this format wrote a single "size of word" byte and
//! then native `size_t`/`double` fields, so a model saved on one platform
//! could fail to load on another. This format documents that as a fixed
//! compatibility break: every integer is a fixed little-endian width and
//! every float is IEEE-754 `f64`, the same way a search index format fixes
//! its own header fields at `u32`/`u64` regardless of host word size. A
//! CRC32 footer (identical technique) detects truncation or corruption on
//! load, and saves go through a temp-file-then-rename so a crash mid-write
//! never leaves `-m`'s target path holding a half-written model.
//!
//! Layout:
//!
//! ```text
//! magic:      [u8; 4] = b"LDIG"
//! version:    u8      = 1
//! word_width: u8      = 8 (fixed; rejects files from the legacy
//!                          platform-word-size format this one replaces)
//! k:          u32
//! m:          u32
//! labels:     k * (u8 len, len bytes of UTF-8)
//! text_len:   u64 (UTF-8 byte length of the feature text)
//! text:       text_len bytes, UTF-8
//! features:   m * (u32 begin, u32 len)          -- code-point offsets
//! params:     m * k * f64, row-major W[i*k + k]
//! crc32:      u32 (little-endian, over every byte above)
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crc32fast::Hasher;

use crate::error::{LdigError, Result};
use crate::features::FeatureSet;
use crate::model::Model;
use crate::trie::DoubleArrayTrie;
use crate::types::Feature;

const MAGIC: [u8; 4] = *b"LDIG";
const VERSION: u8 = 1;
const WORD_WIDTH: u8 = 8;

/// Save `model` to `path` by writing to a sibling temporary file and
/// renaming it over the destination, so a crash or short write never
/// corrupts an existing model.
pub fn save(model: &Model, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    write_model(model, &mut buf)?;

    let tmp_path = sibling_tmp_path(path);
    {
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(&buf)?;
        tmp.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "model".into());
    name.push(".tmp");
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => std::path::PathBuf::from(name),
    }
}

fn write_model(model: &Model, out: &mut Vec<u8>) -> Result<()> {
    out.extend_from_slice(&MAGIC);
    out.push(VERSION);
    out.push(WORD_WIDTH);
    out.extend_from_slice(&(model.k as u32).to_le_bytes());
    out.extend_from_slice(&(model.m as u32).to_le_bytes());

    for label in &model.labels {
        let bytes = label.as_bytes();
        if bytes.len() > u8::MAX as usize {
            return Err(LdigError::Format(format!(
                "label {label:?} is longer than {} bytes",
                u8::MAX
            )));
        }
        out.push(bytes.len() as u8);
        out.extend_from_slice(bytes);
    }

    let text_string: String = model.features.text().iter().collect();
    let text_bytes = text_string.as_bytes();
    out.extend_from_slice(&(text_bytes.len() as u64).to_le_bytes());
    out.extend_from_slice(text_bytes);

    for i in 0..model.features.len() {
        let f = model.features.get(i);
        out.extend_from_slice(&(f.begin as u32).to_le_bytes());
        out.extend_from_slice(&(f.len as u32).to_le_bytes());
    }

    for &w in &model.params {
        out.extend_from_slice(&w.to_le_bytes());
    }

    let mut hasher = Hasher::new();
    hasher.update(out);
    let crc = hasher.finalize();
    out.extend_from_slice(&crc.to_le_bytes());

    Ok(())
}

/// Load a model previously written by [`save`].
pub fn load(path: &Path) -> Result<Model> {
    let mut file = File::open(path)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    load_bytes(&buf)
}

/// Parse a model directly out of an in-memory buffer, bypassing the
/// filesystem. Every path through this function must return `Err` on
/// malformed input rather than panicking — the fuzz target in
/// `fuzz/fuzz_targets/model_io_parsing.rs` hammers exactly this entry
/// point with adversarial bytes.
pub fn load_bytes(buf: &[u8]) -> Result<Model> {
    read_model(buf)
}

fn read_model(buf: &[u8]) -> Result<Model> {
    if buf.len() < 4 + 1 + 1 + 4 + 4 + 8 + 4 {
        return Err(LdigError::Format("model file is too short".into()));
    }

    let (body, footer) = buf.split_at(buf.len() - 4);
    let expected_crc = u32::from_le_bytes(footer.try_into().unwrap());
    let mut hasher = Hasher::new();
    hasher.update(body);
    if hasher.finalize() != expected_crc {
        return Err(LdigError::Format("model file failed CRC32 check".into()));
    }

    let mut cur = Cursor::new(body);
    let magic = cur.take(4)?;
    if magic != MAGIC {
        return Err(LdigError::Format("not an ldig model file (bad magic)".into()));
    }
    let version = cur.u8()?;
    if version != VERSION {
        return Err(LdigError::Format(format!(
            "unsupported model format version {version}"
        )));
    }
    let word_width = cur.u8()?;
    if word_width != WORD_WIDTH {
        return Err(LdigError::Format(
            "cannot load a model built on a different word-size format".into(),
        ));
    }

    let k = cur.u32()? as usize;
    let m = cur.u32()? as usize;

    let mut labels = Vec::with_capacity(k);
    for _ in 0..k {
        let len = cur.u8()? as usize;
        let bytes = cur.take(len)?;
        let label = String::from_utf8(bytes.to_vec())
            .map_err(|_| LdigError::Format("label is not valid UTF-8".into()))?;
        labels.push(label);
    }

    let text_len = cur.u64()? as usize;
    let text_bytes = cur.take(text_len)?;
    let text_str = std::str::from_utf8(text_bytes)
        .map_err(|_| LdigError::Format("feature text is not valid UTF-8".into()))?;
    let text: Vec<char> = text_str.chars().collect();

    let mut features = Vec::with_capacity(m);
    for _ in 0..m {
        let begin = cur.u32()? as usize;
        let len = cur.u32()? as usize;
        features.push(Feature::new(begin, len));
    }

    let mut params = Vec::with_capacity(m * k);
    for _ in 0..(m * k) {
        params.push(cur.f64()?);
    }

    let label_index = labels
        .iter()
        .enumerate()
        .map(|(i, s)| (s.clone(), i))
        .collect();

    let feature_set = FeatureSet::with_text_and_features(text, features);
    let trie = DoubleArrayTrie::build(&feature_set);

    Ok(Model {
        k,
        m,
        features: feature_set,
        trie,
        labels,
        label_index,
        params,
    })
}

/// A small forward-only byte cursor with bounds-checked fixed-width reads,
/// used only by [`read_model`] — this format has no other consumer and
/// doesn't warrant pulling in a general binary-reader crate.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(LdigError::Format("model file is truncated".into()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }
}
