// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::models::{
    GraphQLRequest, GraphQLResponse, QueryVariables, TagFilter, TransactionConnection,
    TRANSACTIONS_BY_TAG_QUERY,
};
use crate::{IndexQueryError, TransactionIndex};
use async_trait::async_trait;
use electora_config::{Endpoint, EndpointAuth, IndexConfig};
use electora_utils::{excerpt, with_auth, ElectionId, TransactionRef};
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, instrument, trace};

/// Locates ballots by querying a GraphQL transaction index for a fixed tag.
#[derive(Clone, Debug)]
pub struct GraphQlLocator {
    client: reqwest::Client,
    endpoint: Endpoint,
    tag_name: String,
    page_size: u32,
    auth: EndpointAuth,
}

impl GraphQlLocator {
    pub fn new(endpoint: Endpoint, tag_name: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            tag_name: tag_name.into(),
            page_size: IndexConfig::default().page_size,
            auth: EndpointAuth::None,
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(config.url.clone(), config.tag_name.clone())
            .with_page_size(config.page_size)
            .with_auth(config.auth.clone())
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_auth(mut self, auth: EndpointAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn variables(&self, election: &ElectionId, after: Option<String>) -> QueryVariables {
        QueryVariables {
            tags: vec![TagFilter {
                name: self.tag_name.clone(),
                values: vec![election.as_str().to_string()],
            }],
            first: self.page_size,
            after,
        }
    }

    async fn fetch_page(
        &self,
        election: &ElectionId,
        after: Option<String>,
    ) -> Result<TransactionConnection, IndexQueryError> {
        let request = GraphQLRequest {
            query: TRANSACTIONS_BY_TAG_QUERY,
            variables: self.variables(election, after),
        };

        let response = with_auth(self.client.post(self.endpoint.url().clone()), &self.auth)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        if !status.is_success() {
            return Err(IndexQueryError::Status {
                status: status.as_u16(),
                body: excerpt(&response_text),
            });
        }

        parse_page(&response_text)
    }
}

#[async_trait]
impl TransactionIndex for GraphQlLocator {
    #[instrument(skip(self), fields(endpoint = %self.endpoint, tag = %self.tag_name))]
    async fn locate(&self, election: &ElectionId) -> Result<Vec<TransactionRef>, IndexQueryError> {
        let refs = collect_pages(|after| self.fetch_page(election, after)).await?;
        debug!("index returned {} ballot transactions", refs.len());
        Ok(refs)
    }
}

/// Parse one page of the index response.
pub fn parse_page(body: &str) -> Result<TransactionConnection, IndexQueryError> {
    let response: GraphQLResponse = serde_json::from_str(body)
        .map_err(|e| IndexQueryError::Malformed(format!("{e}: {}", excerpt(body))))?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(IndexQueryError::Query(messages.join("; ")));
    }

    response
        .data
        .map(|data| data.transactions)
        .ok_or_else(|| IndexQueryError::Malformed("response carries no data".to_string()))
}

/// Drive `fetch_page` from the first page until the index reports no further pages.
///
/// Each call receives the cursor of the last edge seen so far. References keep the order the
/// index returned them in. A cursor handed out twice means the index is looping and is an error.
pub async fn collect_pages<F, Fut>(
    mut fetch_page: F,
) -> Result<Vec<TransactionRef>, IndexQueryError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<TransactionConnection, IndexQueryError>>,
{
    let mut refs = Vec::new();
    let mut after: Option<String> = None;
    let mut seen = HashSet::new();

    loop {
        let page = fetch_page(after.clone()).await?;
        trace!(
            "page after {:?}: {} edges, has_next_page={}",
            after,
            page.edges.len(),
            page.page_info.has_next_page
        );

        let last_cursor = page.edges.last().map(|edge| edge.cursor.clone());
        refs.extend(
            page.edges
                .into_iter()
                .map(|edge| TransactionRef::new(edge.node.id)),
        );

        if !page.page_info.has_next_page {
            return Ok(refs);
        }

        match last_cursor {
            None => {
                return Err(IndexQueryError::Malformed(
                    "page reports more results but carries no edges".to_string(),
                ))
            }
            Some(cursor) if !seen.insert(cursor.clone()) => {
                return Err(IndexQueryError::Malformed(format!(
                    "cursor {cursor} was already visited"
                )))
            }
            Some(cursor) => after = Some(cursor),
        }
    }
}
