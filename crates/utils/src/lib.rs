// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod formatters;
pub mod http;
pub mod retry;
#[cfg(any(test, feature = "stub-server"))]
pub mod stub_server;
pub mod utility_types;
pub use formatters::*;
pub use http::*;
pub use retry::*;
pub use utility_types::*;
