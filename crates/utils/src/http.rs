// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use electora_config::EndpointAuth;
use reqwest::RequestBuilder;

/// Attach configured credentials to an outgoing request
pub fn with_auth(request: RequestBuilder, auth: &EndpointAuth) -> RequestBuilder {
    match auth {
        EndpointAuth::None => request,
        EndpointAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
        EndpointAuth::Bearer(token) => request.bearer_auth(token),
    }
}

/// Shorten a response body so it can be placed in an error message
pub fn excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let client = reqwest::Client::new();
        let request = with_auth(
            client.get("http://localhost/x"),
            &EndpointAuth::Bearer("tok".to_string()),
        )
        .build()
        .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer tok"
        );
    }

    #[test]
    fn test_no_auth_leaves_request_alone() {
        let client = reqwest::Client::new();
        let request = with_auth(client.get("http://localhost/x"), &EndpointAuth::None)
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short"), "short");
        let long = "é".repeat(300);
        assert!(excerpt(&long).ends_with("..."));
    }
}
