// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Threshold decryption of condition gated ciphertexts.
//!
//! [`ThresholdClient`] bootstraps against a [`DecryptionNetwork`] once and then asks it for
//! decryption shares. Failures are typed as [`DecryptError`] and each one carries a
//! [`Disposition`] telling the caller whether to skip the vote, retry or abort.

mod client;
mod error;
mod http_network;
mod memory;
mod request;
mod traits;
pub use client::*;
pub use error::*;
pub use http_network::*;
pub use memory::*;
pub use request::*;
pub use traits::*;
