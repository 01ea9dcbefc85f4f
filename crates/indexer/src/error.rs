// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexQueryError {
    #[error("Request to index service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Index service answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Index service rejected the query: {0}")]
    Query(String),

    #[error("Malformed index response: {0}")]
    Malformed(String),
}
