// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod backend;
mod envelope;
mod error;
mod proof;
mod verifier;
pub use backend::*;
pub use envelope::*;
pub use error::*;
pub use proof::*;
pub use verifier::*;
