// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};

/// Query sent to the index. Results are sorted by block height so discovery order is stable.
pub const TRANSACTIONS_BY_TAG_QUERY: &str = r#"
query TransactionsByTag($tags: [TagFilter!], $first: Int, $after: String) {
    transactions(tags: $tags, first: $first, after: $after, sort: HEIGHT_ASC) {
        pageInfo {
            hasNextPage
        }
        edges {
            cursor
            node {
                id
            }
        }
    }
}
"#;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TagFilter {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct QueryVariables {
    pub tags: Vec<TagFilter>,
    pub first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a> {
    pub query: &'a str,
    pub variables: QueryVariables,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<TransactionsData>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsData {
    pub transactions: TransactionConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionConnection {
    pub page_info: PageInfo,
    pub edges: Vec<TransactionEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct TransactionEdge {
    pub cursor: String,
    pub node: TransactionNode,
}

#[derive(Debug, Deserialize)]
pub struct TransactionNode {
    pub id: String,
}
