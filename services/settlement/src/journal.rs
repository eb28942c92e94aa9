//! Append-only journal with CRC32C checksums
//!
//! # Binary Format (per entry)
//! ```text
//! [body_len:  u32]
//! [sequence:  u64]
//! [timestamp: u64]
//! [payload_len: u32][payload: bytes]
//! [checksum:  u32]  // CRC32C over sequence+timestamp+payload
//! ```

use crc32c::crc32c;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt journal: {0}")]
    Corrupt(String),

    #[error("Checksum mismatch at sequence {sequence}")]
    ChecksumMismatch { sequence: u64 },
}

/// A single journal entry holding one serialized trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Sequence of the recorded trade
    pub sequence: u64,
    /// Execution time, unix seconds
    pub timestamp: u64,
    /// Bincode-serialized trade
    pub payload: Vec<u8>,
    /// CRC32C over (sequence ++ timestamp ++ payload)
    pub checksum: u32,
}

impl JournalEntry {
    /// Create a new entry, computing the checksum automatically.
    pub fn new(sequence: u64, timestamp: u64, payload: Vec<u8>) -> Self {
        let checksum = Self::compute_checksum(sequence, timestamp, &payload);
        Self {
            sequence,
            timestamp,
            payload,
            checksum,
        }
    }

    fn compute_checksum(sequence: u64, timestamp: u64, payload: &[u8]) -> u32 {
        let mut buf = Vec::with_capacity(16 + payload.len());
        buf.extend_from_slice(&sequence.to_le_bytes());
        buf.extend_from_slice(&timestamp.to_le_bytes());
        buf.extend_from_slice(payload);
        crc32c(&buf)
    }

    /// Validate the stored checksum against the recomputed value.
    pub fn verify_checksum(&self) -> bool {
        self.checksum == Self::compute_checksum(self.sequence, self.timestamp, &self.payload)
    }

    /// Serialize to the binary wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let payload_len = self.payload.len() as u32;
        // body = 8 (seq) + 8 (ts) + 4 (pl_len) + payload + 4 (crc)
        let body_len: u32 = 8 + 8 + 4 + payload_len + 4;

        let mut buf = Vec::with_capacity(4 + body_len as usize);
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.extend_from_slice(&self.sequence.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&payload_len.to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf.extend_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Deserialize one entry from `data`, returning `(entry, bytes_consumed)`.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), JournalError> {
        if data.len() < 4 {
            return Err(JournalError::Corrupt("truncated length prefix".into()));
        }

        let body_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        // Reject implausible lengths before allocating
        if body_len > 16_000_000 {
            return Err(JournalError::Corrupt(format!(
                "implausible body length {body_len}"
            )));
        }

        let total = 4 + body_len;
        if data.len() < total || body_len < 24 {
            return Err(JournalError::Corrupt("truncated entry".into()));
        }

        let mut offset = 4;
        let sequence = u64::from_le_bytes(data[offset..offset + 8].try_into().expect("8 bytes"));
        offset += 8;
        let timestamp = u64::from_le_bytes(data[offset..offset + 8].try_into().expect("8 bytes"));
        offset += 8;
        let payload_len =
            u32::from_le_bytes(data[offset..offset + 4].try_into().expect("4 bytes")) as usize;
        offset += 4;

        if 24 + payload_len != body_len {
            return Err(JournalError::Corrupt("payload length mismatch".into()));
        }

        let payload = data[offset..offset + payload_len].to_vec();
        offset += payload_len;
        let checksum = u32::from_le_bytes(data[offset..offset + 4].try_into().expect("4 bytes"));

        let entry = Self {
            sequence,
            timestamp,
            payload,
            checksum,
        };
        if !entry.verify_checksum() {
            return Err(JournalError::ChecksumMismatch { sequence });
        }

        Ok((entry, total))
    }
}

/// Appending journal writer.
#[derive(Debug)]
pub struct JournalWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl JournalWriter {
    /// Open the journal at `path` for appending, creating it if absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Append one entry and flush it to the file.
    pub fn append(&mut self, entry: &JournalEntry) -> Result<(), JournalError> {
        self.writer.write_all(&entry.to_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read every entry from the journal at `path`, verifying checksums.
///
/// A missing file reads as an empty journal so a fresh deployment starts
/// clean. Corruption surfaces as an error, never as silent truncation.
pub fn read_journal(path: impl AsRef<Path>) -> Result<Vec<JournalEntry>, JournalError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    let mut entries = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (entry, consumed) = JournalEntry::from_bytes(&data[offset..])?;
        entries.push(entry);
        offset += consumed;
    }
    Ok(entries)
}
