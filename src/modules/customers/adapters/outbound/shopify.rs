use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::modules::customers::core::customer::CustomerRecord;
use crate::modules::customers::core::pagination::{PageCursor, PageResult};
use crate::modules::customers::use_cases::browse_customers::directory_port::{
    CustomerDirectory, FetchError,
};
use crate::modules::customers::use_cases::edit_attributes::writer_port::{
    MetafieldWriter, WriteError,
};

const API_VERSION: &str = "2024-01";
const PAGE_SIZE: u32 = 50;

const CUSTOMER_PAGE_QUERY: &str = r#"
query CustomerPage($first: Int!, $after: String, $query: String) {
  customers(first: $first, after: $after, query: $query) {
    edges {
      node {
        id
        firstName
        lastName
        email
        metafields(first: 5, namespace: "custom") {
          edges {
            node {
              key
              value
            }
          }
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

const METAFIELDS_SET_MUTATION: &str = r#"
mutation WriteCustomerMetafield($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields {
      key
    }
    userErrors {
      field
      message
    }
  }
}
"#;

/// Static remote-access configuration, resolved once at startup and injected
/// at construction.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    pub store_domain: String,
    pub access_token: String,
}

impl ShopifyConfig {
    /// Reads `SHOPIFY_STORE_DOMAIN` and `SHOPIFY_ADMIN_API_TOKEN`. Returns
    /// None when either is absent or blank.
    pub fn from_env() -> Option<Self> {
        let store_domain = std::env::var("SHOPIFY_STORE_DOMAIN")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        let access_token = std::env::var("SHOPIFY_ADMIN_API_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        Some(Self {
            store_domain,
            access_token,
        })
    }

    fn graphql_endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{API_VERSION}/graphql.json",
            self.store_domain
        )
    }
}

enum CallFailure {
    NotConfigured,
    Transport(String),
    Rejected(String),
}

/// The Shopify Admin API as customer directory and metafield writer.
///
/// Missing configuration is a standing precondition failure: every call is
/// answered without a network attempt, and nothing is retried.
pub struct ShopifyDirectory {
    config: Option<ShopifyConfig>,
    http: reqwest::Client,
}

impl ShopifyDirectory {
    pub fn new(config: Option<ShopifyConfig>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ShopifyConfig::from_env())
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    async fn post_graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, CallFailure> {
        let Some(config) = &self.config else {
            return Err(CallFailure::NotConfigured);
        };

        let response = self
            .http
            .post(config.graphql_endpoint())
            .header("X-Shopify-Access-Token", &config.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|error| CallFailure::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallFailure::Rejected(format!("status {status}: {body}")));
        }

        let envelope: GraphqlEnvelope = response
            .json()
            .await
            .map_err(|error| CallFailure::Transport(error.to_string()))?;
        if !envelope.errors.is_empty() {
            let detail = envelope
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CallFailure::Rejected(detail));
        }
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl CustomerDirectory for ShopifyDirectory {
    async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        search: Option<&str>,
    ) -> Result<PageResult, FetchError> {
        let variables = json!({
            "first": PAGE_SIZE,
            "after": cursor.map(PageCursor::as_str),
            "query": search,
        });

        let data = self
            .post_graphql(CUSTOMER_PAGE_QUERY, variables)
            .await
            .map_err(|failure| match failure {
                CallFailure::NotConfigured => FetchError::ConfigurationMissing,
                CallFailure::Transport(detail) => FetchError::TransportFailure(detail),
                CallFailure::Rejected(detail) => FetchError::RemoteRejected(detail),
            })?;

        parse_customer_page(&data)
    }
}

#[async_trait]
impl MetafieldWriter for ShopifyDirectory {
    async fn write_metafield(
        &self,
        customer_id: &str,
        key: &str,
        value: &str,
        namespace: &str,
        value_type: &str,
    ) -> Result<(), WriteError> {
        let variables = json!({
            "metafields": [{
                "ownerId": customer_id,
                "key": key,
                "value": value,
                "namespace": namespace,
                "type": value_type,
            }],
        });

        let data = self
            .post_graphql(METAFIELDS_SET_MUTATION, variables)
            .await
            .map_err(|failure| match failure {
                CallFailure::NotConfigured => {
                    WriteError::TransportFailure("remote directory is not configured".into())
                }
                CallFailure::Transport(detail) => WriteError::TransportFailure(detail),
                CallFailure::Rejected(detail) => WriteError::RemoteRejected(detail),
            })?;

        parse_write_outcome(&data)
    }
}

#[derive(Deserialize)]
struct GraphqlEnvelope {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerConnection {
    edges: Vec<CustomerEdge>,
    page_info: RemotePageInfo,
}

#[derive(Deserialize)]
struct CustomerEdge {
    node: CustomerNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerNode {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    #[serde(default)]
    metafields: Option<MetafieldConnection>,
}

#[derive(Deserialize)]
struct MetafieldConnection {
    edges: Vec<MetafieldEdge>,
}

#[derive(Deserialize)]
struct MetafieldEdge {
    node: MetafieldNode,
}

#[derive(Deserialize)]
struct MetafieldNode {
    key: String,
    value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemotePageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetafieldsSetPayload {
    #[serde(default)]
    user_errors: Vec<RemoteUserError>,
}

#[derive(Deserialize)]
struct RemoteUserError {
    message: String,
}

/// The records field missing from an otherwise successful response is a
/// malformed response, not an empty page.
fn parse_customer_page(data: &serde_json::Value) -> Result<PageResult, FetchError> {
    let Some(connection) = data.get("customers") else {
        return Err(FetchError::MalformedResponse(
            "customers field is absent".into(),
        ));
    };
    let connection: CustomerConnection = serde_json::from_value(connection.clone())
        .map_err(|error| FetchError::MalformedResponse(error.to_string()))?;

    let records = connection
        .edges
        .into_iter()
        .map(|edge| {
            let node = edge.node;
            let mut record = CustomerRecord {
                id: node.id,
                first_name: node.first_name.unwrap_or_default(),
                last_name: node.last_name.unwrap_or_default(),
                email: node.email.unwrap_or_default(),
                metafields: Vec::new(),
            };
            // Upsert instead of push: the remote may repeat a key.
            for metafield in node.metafields.into_iter().flat_map(|c| c.edges) {
                record.upsert_metafield(&metafield.node.key, &metafield.node.value);
            }
            record
        })
        .collect();

    Ok(PageResult {
        records,
        has_next_page: connection.page_info.has_next_page,
        end_cursor: connection.page_info.end_cursor.map(PageCursor::from),
    })
}

fn parse_write_outcome(data: &serde_json::Value) -> Result<(), WriteError> {
    let Some(payload) = data.get("metafieldsSet") else {
        return Err(WriteError::RemoteRejected(
            "metafieldsSet payload is absent".into(),
        ));
    };
    let payload: MetafieldsSetPayload = serde_json::from_value(payload.clone())
        .map_err(|error| WriteError::RemoteRejected(error.to_string()))?;
    if !payload.user_errors.is_empty() {
        let detail = payload
            .user_errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(WriteError::RemoteRejected(detail));
    }
    Ok(())
}
