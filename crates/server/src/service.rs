//! MCP service surface over the dataset catalog.

use datahub_catalog::client::{CatalogError, DatasetCatalog};
use datahub_catalog::tools;
use rmcp::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use serde_json::Value;

/// `ServerHandler` exposing the catalog tools to MCP clients.
#[derive(Clone)]
pub struct CatalogService {
    catalog: DatasetCatalog,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: DatasetCatalog) -> Self {
        Self { catalog }
    }
}

impl ServerHandler for CatalogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Query a Datahub metadata catalog: list datasets, or fetch one dataset by URN. \
                 Responses are raw Datahub JSON."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: tools::list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request
            .arguments
            .map_or_else(|| Value::Object(serde_json::Map::new()), Value::Object);

        match tools::call_tool(&self.catalog, &request.name, &arguments).await {
            Ok(result) => Ok(result),
            Err(e) => catalog_error_to_mcp(e),
        }
    }
}

/// Map catalog failures onto the MCP boundary: bad requests become protocol
/// errors surfaced immediately; upstream failures become failed tool results.
fn catalog_error_to_mcp(e: CatalogError) -> Result<CallToolResult, ErrorData> {
    match e {
        CatalogError::UnsupportedOperation(msg) | CatalogError::InvalidArguments(msg) => {
            Err(ErrorData::invalid_params(msg, None))
        }
        CatalogError::Config(_) | CatalogError::Http(_) | CatalogError::Transport(_) => {
            Ok(CallToolResult {
                content: vec![Content::text(e.to_string())],
                structured_content: None,
                is_error: Some(true),
                meta: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn unsupported_operation_is_a_protocol_error() {
        let err = catalog_error_to_mcp(CatalogError::UnsupportedOperation(
            "Tool not found: delete_dataset".to_string(),
        ))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("delete_dataset"));
    }

    #[test]
    fn invalid_arguments_are_a_protocol_error() {
        let err = catalog_error_to_mcp(CatalogError::InvalidArguments(
            "missing field `urn`".to_string(),
        ))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn upstream_failures_become_failed_tool_results() {
        let result = catalog_error_to_mcp(CatalogError::Http(
            "API returned 502 Bad Gateway: upstream down".to_string(),
        ))
        .expect("tool result");
        assert_eq!(result.is_error, Some(true));

        let rendered = serde_json::to_value(&result).expect("serialize");
        let text = rendered["content"][0]["text"].as_str().expect("text");
        assert!(text.contains("502"));
    }

    #[test]
    fn info_advertises_tool_capability() {
        let catalog = DatasetCatalog::new(datahub_catalog::config::CatalogConfig {
            base_url: "http://localhost:8088".to_string(),
            auth: datahub_catalog::config::CatalogAuth::Basic {
                username: "datahub".to_string(),
                password: "datahub".to_string(),
            },
            timeout: datahub_catalog::config::CatalogConfig::DEFAULT_TIMEOUT,
        })
        .expect("catalog");

        let info = CatalogService::new(catalog).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }
}
