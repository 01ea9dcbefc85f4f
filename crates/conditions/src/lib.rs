// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Release conditions are the predicates a threshold decryption network evaluates before it
//! will hand out decryption shares. Votes for an election are only decryptable once the
//! coordinator chain's clock (or height) has reached the election's end.

mod condition;

pub use condition::*;
