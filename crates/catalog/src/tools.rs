//! MCP tool surface over the dataset catalog.
//!
//! A fixed table of tool descriptors plus a name→operation dispatch. Both
//! operations are plain GETs against Datahub, so every tool is advertised as
//! read-only, idempotent and open-world.

use crate::client::{CatalogError, DatasetCatalog, Result};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool, ToolAnnotations};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

pub const LIST_DATASETS: &str = "list_datasets";
pub const GET_DATASET_DETAILS: &str = "get_dataset_details";

/// Page size for `list_datasets` when the caller does not pass one.
pub const DEFAULT_LIST_COUNT: u32 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListDatasetsArgs {
    #[serde(default)]
    count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetDatasetDetailsArgs {
    urn: String,
}

/// The MCP `Tool` descriptors exposed by the catalog.
#[must_use]
pub fn list_tools() -> Vec<Tool> {
    vec![
        tool(
            LIST_DATASETS,
            "List datasets in the Datahub catalog, sorted by URN.",
            json!({
                "type": "object",
                "properties": {
                    "count": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of datasets to return (default 10)."
                    }
                }
            }),
        ),
        tool(
            GET_DATASET_DETAILS,
            "Get a single dataset from the Datahub catalog by its URN.",
            json!({
                "type": "object",
                "required": ["urn"],
                "properties": {
                    "urn": {
                        "type": "string",
                        "description": "Dataset URN, e.g. urn:li:dataset:(urn:li:dataPlatform:trino,db.schema.table,PROD)."
                    }
                }
            }),
        ),
    ]
}

/// Route a named tool call to the catalog and wrap the JSON body as MCP text
/// content, unmodified.
///
/// # Errors
///
/// - `UnsupportedOperation` for unknown tool names (no request is issued)
/// - `InvalidArguments` for missing/mistyped arguments or a malformed URN
/// - `Http`/`Transport` when the upstream call fails
pub async fn call_tool(
    catalog: &DatasetCatalog,
    name: &str,
    arguments: &Value,
) -> Result<CallToolResult> {
    let body = match name {
        LIST_DATASETS => {
            let args: ListDatasetsArgs = parse_args(name, arguments)?;
            catalog
                .list_datasets(args.count.unwrap_or(DEFAULT_LIST_COUNT))
                .await?
        }
        GET_DATASET_DETAILS => {
            let args: GetDatasetDetailsArgs = parse_args(name, arguments)?;
            catalog.dataset_by_urn(&args.urn).await?
        }
        other => {
            return Err(CatalogError::UnsupportedOperation(format!(
                "Tool not found: {other}"
            )));
        }
    };

    let text = if let Some(s) = body.as_str() {
        s.to_string()
    } else {
        serde_json::to_string(&body).unwrap_or_else(|_| body.to_string())
    };
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn parse_args<T: serde::de::DeserializeOwned>(name: &str, arguments: &Value) -> Result<T> {
    serde_json::from_value(arguments.clone()).map_err(|e| {
        CatalogError::InvalidArguments(format!("invalid arguments for '{name}': {e}"))
    })
}

fn tool(name: &'static str, description: &'static str, input_schema: Value) -> Tool {
    let schema_obj = input_schema
        .as_object()
        .cloned()
        .unwrap_or_else(JsonObject::new);
    let mut tool = Tool::new(name, description, Arc::new(schema_obj));
    tool.annotations = Some(read_only_annotations());
    tool
}

fn read_only_annotations() -> ToolAnnotations {
    ToolAnnotations {
        title: None,
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DatasetCatalog;
    use crate::config::{CatalogAuth, CatalogConfig};

    fn offline_catalog() -> DatasetCatalog {
        // Port 9 (discard) is never listened on; tests that reach the network
        // would fail loudly rather than silently pass.
        DatasetCatalog::new(CatalogConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            auth: CatalogAuth::Basic {
                username: "datahub".to_string(),
                password: "datahub".to_string(),
            },
            timeout: CatalogConfig::DEFAULT_TIMEOUT,
        })
        .expect("catalog")
    }

    #[test]
    fn surface_lists_both_tools_with_schemas() {
        let tools = list_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, vec![LIST_DATASETS, GET_DATASET_DETAILS]);

        let get_details = &tools[1];
        let required = get_details
            .input_schema
            .get("required")
            .and_then(Value::as_array)
            .expect("required array");
        assert_eq!(required, &vec![json!("urn")]);
    }

    #[test]
    fn surface_marks_tools_read_only() {
        for t in list_tools() {
            let a = t.annotations.as_ref().expect("annotations");
            assert_eq!(a.read_only_hint, Some(true));
            assert_eq!(a.destructive_hint, Some(false));
            assert_eq!(a.idempotent_hint, Some(true));
            assert_eq!(a.open_world_hint, Some(true));
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected_without_network() {
        let catalog = offline_catalog();
        let err = call_tool(&catalog, "delete_dataset", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedOperation(_)));
    }

    #[tokio::test]
    async fn missing_urn_is_rejected_without_network() {
        let catalog = offline_catalog();
        let err = call_tool(&catalog, GET_DATASET_DETAILS, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn mistyped_count_is_rejected_without_network() {
        let catalog = offline_catalog();
        let err = call_tool(&catalog, LIST_DATASETS, &json!({"count": "ten"}))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn malformed_urn_is_rejected_without_network() {
        let catalog = offline_catalog();
        let err = call_tool(
            &catalog,
            GET_DATASET_DETAILS,
            &json!({"urn": "dataplatform.dm_app.qrcode"}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArguments(_)));
    }
}
