// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Content fingerprinting.
//!
//! The fingerprint is the SHA-256 of the exact bytes of a snapshot. It is
//! computed while the bytes stream through the CSV parser, so a snapshot is
//! read exactly once.

use std::io::{self, Read};

use sha2::{Digest, Sha256};
use votewatch_domain::{DomainError, Fingerprint};

/// A pass-through reader that hashes every byte it yields.
pub struct FingerprintReader<R> {
    inner: R,
    hasher: Sha256,
    bytes_read: u64,
}

impl<R: Read> FingerprintReader<R> {
    /// Wraps a reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes_read: 0,
        }
    }

    /// Number of bytes hashed so far.
    #[must_use]
    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Reads the rest of the stream into the digest without keeping it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    pub fn drain(&mut self) -> io::Result<u64> {
        io::copy(self, &mut io::sink())
    }

    /// Consumes the reader and returns the fingerprint of everything read.
    ///
    /// Call [`Self::drain`] first when the consumer may have stopped early.
    ///
    /// # Errors
    ///
    /// Returns an error if the digest cannot be wrapped as a fingerprint.
    pub fn finish(self) -> Result<Fingerprint, DomainError> {
        Fingerprint::new(hex::encode(self.hasher.finalize()))
    }
}

impl<R: Read> Read for FingerprintReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n: usize = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Fingerprints an in-memory snapshot.
///
/// # Errors
///
/// Returns an error if the digest cannot be wrapped as a fingerprint.
pub fn fingerprint_bytes(bytes: &[u8]) -> Result<Fingerprint, DomainError> {
    Fingerprint::new(hex::encode(Sha256::digest(bytes)))
}
