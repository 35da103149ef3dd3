//! High-score persistence over a small byte-addressed store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{RecordError, StoreError, StoreResult};

/// Byte-addressed persistent memory with an explicit commit.
pub trait ByteStore {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, addr: usize) -> StoreResult<u8>;

    fn write(&mut self, addr: usize, value: u8) -> StoreResult<()>;

    /// Make every write since the last commit durable.
    fn commit(&mut self) -> StoreResult<()>;
}

fn check_range(addr: usize, len: usize) -> StoreResult<()> {
    if addr < len {
        Ok(())
    } else {
        Err(StoreError::OutOfRange { addr, len })
    }
}

// ── In-memory store ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    bytes: Vec<u8>,
    commits: usize,
}

impl MemoryStore {
    /// Fresh store, filled with `0xFF` like erased flash.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0xFF; size],
            commits: 0,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, commits: 0 }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl ByteStore for MemoryStore {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, addr: usize) -> StoreResult<u8> {
        check_range(addr, self.bytes.len())?;
        Ok(self.bytes[addr])
    }

    fn write(&mut self, addr: usize, value: u8) -> StoreResult<()> {
        check_range(addr, self.bytes.len())?;
        self.bytes[addr] = value;
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.commits += 1;
        Ok(())
    }
}

// ── File-backed store ────────────────────────────────────────────────────────

/// Mirrors a fixed-size file in memory; `commit` rewrites the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FileStore {
    /// Open `path`, or start blank when it does not exist yet. A file of the
    /// wrong length is truncated or padded to `size`.
    pub fn open(path: impl AsRef<Path>, size: usize) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "score file missing, starting blank");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        bytes.resize(size, 0xFF);
        Ok(Self { path, bytes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteStore for FileStore {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, addr: usize) -> StoreResult<u8> {
        check_range(addr, self.bytes.len())?;
        Ok(self.bytes[addr])
    }

    fn write(&mut self, addr: usize, value: u8) -> StoreResult<()> {
        check_range(addr, self.bytes.len())?;
        self.bytes[addr] = value;
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        fs::write(&self.path, &self.bytes)?;
        Ok(())
    }
}

// ── Score record ─────────────────────────────────────────────────────────────

pub const RECORD_MAGIC: u8 = 0xA5;
pub const RECORD_VERSION: u8 = 1;
pub const RECORD_LEN: usize = 4;

/// Decode a `[magic, version, lo, hi]` record.
pub fn decode_record(bytes: [u8; RECORD_LEN]) -> Result<u16, RecordError> {
    let [magic, version, lo, hi] = bytes;
    if magic != RECORD_MAGIC {
        return Err(RecordError::BadMagic { found: magic });
    }
    if version != RECORD_VERSION {
        return Err(RecordError::UnsupportedVersion { found: version });
    }
    Ok(u16::from_le_bytes([lo, hi]))
}

pub fn encode_record(score: u16) -> [u8; RECORD_LEN] {
    let [lo, hi] = score.to_le_bytes();
    [RECORD_MAGIC, RECORD_VERSION, lo, hi]
}

/// One game's high score, kept at a fixed base address.
#[derive(Debug)]
pub struct ScoreStore<S> {
    store: S,
    base: usize,
    high: u16,
}

impl<S: ByteStore> ScoreStore<S> {
    /// Wrap `store` and load the current high score from `base`.
    pub fn new(store: S, base: usize) -> Self {
        let mut adapter = Self {
            store,
            base,
            high: 0,
        };
        adapter.high = adapter.load();
        adapter
    }

    /// Read the record. Anything unreadable or unrecognised counts as 0.
    pub fn load(&self) -> u16 {
        let mut bytes = [0u8; RECORD_LEN];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            match self.store.read(self.base + offset) {
                Ok(value) => *byte = value,
                Err(e) => {
                    warn!(base = self.base, error = %e, "high score unreadable");
                    return 0;
                }
            }
        }
        match decode_record(bytes) {
            Ok(score) => score,
            // An erased store is the normal first-run state.
            Err(RecordError::BadMagic { found: 0xFF }) => 0,
            Err(e) => {
                warn!(base = self.base, error = %e, "ignoring high score record");
                0
            }
        }
    }

    /// Persist `score` if it beats the current high score. Returns whether
    /// a new record was written.
    pub fn save(&mut self, score: u32) -> StoreResult<bool> {
        let score = u16::try_from(score).unwrap_or(u16::MAX);
        if score <= self.high {
            return Ok(false);
        }
        for (offset, byte) in encode_record(score).into_iter().enumerate() {
            self.store.write(self.base + offset, byte)?;
        }
        self.store.commit()?;
        info!(base = self.base, score, previous = self.high, "new high score");
        self.high = score;
        Ok(true)
    }

    pub fn high(&self) -> u16 {
        self.high
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
