// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Reading the operation-log directory (an append-only, already-finalized
//! history this crate never writes to) and checkpointing curve state
//! between stages.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::numeric::scalar::Scalar;
use crate::record::op::LogEntry;
use crate::track::curve::QueryCurve;
use crate::track::error::TrackError;

pub fn read_log_entry(path: &Path) -> Result<LogEntry, TrackError> {
    let file = File::open(path)?;
    let entry = serde_json::from_reader(BufReader::new(file))?;
    Ok(entry)
}

/// Reads `0.json`, `1.json`, ... until the first missing index.
pub fn read_log_dir(dir: &Path) -> Result<Vec<LogEntry>, TrackError> {
    let mut entries = Vec::new();
    loop {
        let path = dir.join(format!("{}.json", entries.len()));
        if !path.exists() {
            break;
        }
        entries.push(read_log_entry(&path)?);
    }
    log::debug!("read {} log entries from {}", entries.len(), dir.display());
    Ok(entries)
}

pub fn write_curve_snapshot<T: Scalar>(
    path: &Path,
    curves: &[QueryCurve<T>],
) -> Result<(), TrackError> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), curves)?;
    Ok(())
}

pub fn read_curve_snapshot<T: Scalar>(path: &Path) -> Result<Vec<QueryCurve<T>>, TrackError> {
    let file = File::open(path)?;
    let curves = serde_json::from_reader(BufReader::new(file))?;
    Ok(curves)
}
