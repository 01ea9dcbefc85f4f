// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Compressed proof envelope.
//!
//! ```text
//! | "ELPF" (4) | version (1) | sha256(payload) (32) | payload: zlib(json(EligibilityProof)) |
//! ```

use crate::{EligibilityProof, ProofDecodeError};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::io::{Read, Write};

pub const ENVELOPE_MAGIC: &[u8; 4] = b"ELPF";
pub const ENVELOPE_VERSION: u8 = 1;
const DIGEST_LEN: usize = 32;
const HEADER_LEN: usize = ENVELOPE_MAGIC.len() + 1 + DIGEST_LEN;

/// Pack a proof into the compressed envelope
pub fn compress(proof: &EligibilityProof) -> std::io::Result<Vec<u8>> {
    let json = serde_json::to_vec(proof)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json)?;
    let payload = encoder.finish()?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(ENVELOPE_MAGIC);
    out.push(ENVELOPE_VERSION);
    out.extend_from_slice(&Sha256::digest(&payload));
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Unpack a compressed envelope
pub fn decompress(bytes: &[u8]) -> Result<EligibilityProof, ProofDecodeError> {
    if bytes.len() <= HEADER_LEN {
        return Err(ProofDecodeError::Truncated(bytes.len()));
    }
    let (magic, rest) = bytes.split_at(ENVELOPE_MAGIC.len());
    if magic != ENVELOPE_MAGIC {
        return Err(ProofDecodeError::BadMagic);
    }
    let (version, rest) = (rest[0], &rest[1..]);
    if version != ENVELOPE_VERSION {
        return Err(ProofDecodeError::UnsupportedVersion(version));
    }
    let (digest, payload) = rest.split_at(DIGEST_LEN);
    if Sha256::digest(payload).as_slice() != digest {
        return Err(ProofDecodeError::DigestMismatch);
    }

    let mut json = Vec::new();
    ZlibDecoder::new(payload)
        .read_to_end(&mut json)
        .map_err(ProofDecodeError::Decompress)?;
    Ok(serde_json::from_slice(&json)?)
}
