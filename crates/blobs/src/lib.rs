// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod error;
mod http_store;
mod memory;
mod traits;

pub use error::*;
pub use http_store::*;
pub use memory::*;
pub use traits::*;
