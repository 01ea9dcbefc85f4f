// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod app_config;
mod endpoint;
pub mod load_config;
mod network;
mod yaml;

pub use app_config::*;
pub use endpoint::*;
pub use network::*;
