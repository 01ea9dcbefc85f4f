// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod error;
mod locator;
pub mod models;
mod static_index;
mod traits;
pub use error::*;
pub use locator::*;
pub use static_index::*;
pub use traits::*;
