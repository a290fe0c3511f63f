//! Tool-invocation surface: two named tools with JSON arguments that answer
//! with a single text payload.

use crate::error::{AppError, RequestError};
use crate::query::{Catalog, FindClosestRequest, TargetSelector, DEFAULT_MAX_PRICE, DEFAULT_MIN_ROOMS};
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const FIND_CLOSEST_PROPERTIES: &str = "find_closest_properties";
pub const PROPERTY_STATISTICS: &str = "property_statistics";

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: FIND_CLOSEST_PROPERTIES,
            description: "Find the 3 closest properties to a clinic, school, or both",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "location_type": {
                        "type": "string",
                        "enum": ["clinic", "school", "both"],
                        "description": "Type of target location to calculate distances from",
                        "default": "both"
                    },
                    "max_price": {
                        "type": ["number", "null"],
                        "description": "Maximum price in NIS; null for no limit",
                        "default": DEFAULT_MAX_PRICE
                    },
                    "min_rooms": {
                        "type": ["number", "null"],
                        "description": "Minimum number of rooms; null for no limit",
                        "default": DEFAULT_MIN_ROOMS
                    }
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: PROPERTY_STATISTICS,
            description: "Get statistics about properties in the dataset",
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}

/// A validated tool invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolCall {
    FindClosest(FindClosestRequest),
    Statistics,
}

impl ToolCall {
    /// Validate name and arguments. Nothing is loaded or geocoded here.
    pub fn parse(name: &str, arguments: Option<&Value>) -> Result<Self, RequestError> {
        let empty = Map::new();
        let args = match arguments {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => return Err(invalid(name, "arguments must be a JSON object")),
        };

        match name {
            FIND_CLOSEST_PROPERTIES => {
                let location_type = match args.get("location_type") {
                    None | Some(Value::Null) => TargetSelector::default(),
                    Some(Value::String(raw)) => raw.parse()?,
                    Some(_) => return Err(invalid(name, "location_type must be a string")),
                };
                Ok(ToolCall::FindClosest(FindClosestRequest {
                    location_type,
                    max_price: bound(name, args, "max_price", DEFAULT_MAX_PRICE)?,
                    min_rooms: bound(name, args, "min_rooms", DEFAULT_MIN_ROOMS)?,
                }))
            }
            PROPERTY_STATISTICS => Ok(ToolCall::Statistics),
            other => Err(RequestError::UnknownTool(other.to_string())),
        }
    }
}

/// Missing means the default; an explicit null means no bound.
fn bound(
    tool: &str,
    args: &Map<String, Value>,
    key: &str,
    default: f64,
) -> Result<Option<f64>, RequestError> {
    match args.get(key) {
        None => Ok(Some(default)),
        Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid(tool, &format!("{} must be a number", key))),
    }
}

fn invalid(tool: &str, message: &str) -> RequestError {
    RequestError::InvalidArguments {
        tool: tool.to_string(),
        message: message.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text",
                text: text.into(),
            }],
            is_error: false,
        }
    }
}

/// Run a validated call against the catalog, loading it on first use.
pub fn invoke(catalog: &mut Catalog, call: &ToolCall) -> Result<ToolResponse, AppError> {
    let finder = catalog.finder()?;
    let text = match call {
        ToolCall::FindClosest(request) => finder.find_closest(request).to_string(),
        ToolCall::Statistics => finder.statistics().to_string(),
    };
    Ok(ToolResponse::text(text))
}
