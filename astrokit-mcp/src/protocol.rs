//! JSON-RPC request handling and the MCP tools

use astrokit_core::Value;
use astrokit_plugin::{EvalContext, PluginRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::convert::{json_to_value, value_to_json};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "astrokit";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

impl McpResponse {
    fn new(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => Self { jsonrpc: "2.0".to_string(), id, result: Some(r), error: None },
            Err(e) => Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(e) },
        }
    }
}

/// Function libraries plus the context calls run in
pub struct Server {
    ctx: EvalContext,
}

impl Server {
    pub fn new(registry: PluginRegistry, warnings_as_errors: bool) -> Self {
        Self {
            ctx: EvalContext::new(Arc::new(registry)).with_warnings_as_errors(warnings_as_errors),
        }
    }

    pub fn function_count(&self) -> usize {
        self.ctx.registry.len()
    }

    /// Handle one input line. Returns `None` for blank lines and
    /// notifications, which get no response.
    pub fn handle_line(&self, line: &str) -> Option<McpResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let request: McpRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return Some(McpResponse::new(None, Err(McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                })));
            }
        };

        debug!(method = %request.method, "processing");
        let response = self.handle_request(&request);

        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            return None;
        }
        Some(response)
    }

    pub fn handle_request(&self, request: &McpRequest) -> McpResponse {
        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(&request.params),
            "initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => handle_tools_list(),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };
        McpResponse::new(request.id.clone(), result)
    }

    fn handle_tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;
        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        match name {
            "call" => self.tool_call(&args),
            "help" => self.tool_help(&args),
            "list_functions" => self.tool_list_functions(&args),
            _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }

    fn tool_call(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let function = args.get("function")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing function argument"))?;
        let call_args: Vec<Value> = match args.get("args") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items.iter().map(json_to_value).collect(),
            Some(_) => return Err(McpError::invalid_params("args must be an array")),
        };

        let result = self.ctx.call(function, &call_args);
        let text = match &result {
            Value::Error(e) => format!("Error: {}", e),
            value => format!("{} = {}", function, value),
        };
        if result.is_error() {
            info!(function, "call returned an error");
        }

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "data": value_to_json(&result),
            "isError": result.is_error()
        }))
    }

    fn tool_help(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let name = args.get("name").and_then(|v| v.as_str());
        let help = self.ctx.registry.help(name);

        Ok(json!({
            "content": [{ "type": "text", "text": format_help(&help) }],
            "data": value_to_json(&help),
            "isError": help.is_error()
        }))
    }

    fn tool_list_functions(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let category = args.get("category").and_then(|v| v.as_str());
        let functions = self.ctx.registry.list_functions(category);
        let count = functions.as_list().map_or(0, |l| l.len());
        Ok(json!({
            "content": [{ "type": "text", "text": format!("{} functions listed", count) }],
            "data": value_to_json(&functions)
        }))
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Astronomy toolbox: measurement combination, flux conversions, synthetic photometry"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'list_functions' to see what is available and 'help' for a function's arguments. Run a function with 'call'. Missing catalogue values can be passed as null."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "call",
                "description": "Call an astrokit function with positional arguments.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "function": {
                            "type": "string",
                            "description": "Function name, e.g. combine_measurements"
                        },
                        "args": {
                            "type": "array",
                            "description": "Positional arguments; null skips an optional one"
                        }
                    },
                    "required": ["function"]
                }
            },
            {
                "name": "help",
                "description": "Get documentation for a function, or general help.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Function name. Omit for general help."
                        }
                    }
                }
            },
            {
                "name": "list_functions",
                "description": "List all available functions, optionally by category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Filter: measure, flux, optics, photometry, names",
                            "enum": ["measure", "flux", "optics", "photometry", "names"]
                        }
                    }
                }
            }
        ]
    }))
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) if map.contains_key("name") => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::List(args)) = map.get("args") {
                for arg in args {
                    out.push_str(&format!("- `{}` ({}): {}\n", arg.get("name"), arg.get("type"), arg.get("description")));
                }
            }
            out
        }
        Value::Object(map) => {
            let mut out = String::from("# astrokit\n\n");
            if let Some(Value::Object(categories)) = map.get("functions") {
                let mut names: Vec<&String> = categories.keys().collect();
                names.sort();
                for cat in names {
                    out.push_str(&format!("**{}**: {}\n", cat, categories[cat]));
                }
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::standard_registry;

    fn server() -> Server {
        Server::new(standard_registry(), false)
    }

    fn respond(server: &Server, line: &str) -> JsonValue {
        let response = server.handle_line(line).expect("response expected");
        serde_json::to_value(&response).unwrap()
    }

    #[test]
    fn test_initialize() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test"}}}"#);
        assert_eq!(r["id"], 1);
        assert_eq!(r["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(r["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_notification_gets_no_response() {
        assert!(server().handle_line(r#"{"jsonrpc":"2.0","method":"initialized"}"#).is_none());
        assert!(server().handle_line("   ").is_none());
    }

    #[test]
    fn test_parse_error() {
        let r = respond(&server(), "{not json");
        assert_eq!(r["error"]["code"], PARSE_ERROR);
        assert!(r.get("id").is_none());
    }

    #[test]
    fn test_unknown_method() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#);
        assert_eq!(r["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(r["id"], "a");
    }

    #[test]
    fn test_tools_list() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#);
        let names: Vec<&str> = r["result"]["tools"].as_array().unwrap()
            .iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["call", "help", "list_functions"]);
    }

    #[test]
    fn test_call_combine_measurements() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"call","arguments":{"function":"combine_measurements","args":[[10,12],[1,1],[0,0]]}}}"#);
        let result = &r["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["value"], 11.0);
        assert_eq!(result["data"]["flag"], 0.0);
        assert!(result["data"]["warning"].is_null());
    }

    #[test]
    fn test_call_with_nulls_for_gaps() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"call","arguments":{"function":"combine_measurements","args":[[null,4,6]]}}}"#);
        assert_eq!(r["result"]["data"]["value"], 5.0);
    }

    #[test]
    fn test_call_error_is_reported_in_result() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"call","arguments":{"function":"combine_measurements","args":[[null],[0],[5]]}}}"#);
        assert_eq!(r["result"]["isError"], true);
        assert_eq!(r["result"]["data"]["_error"]["code"], "NO_VALID_MEASUREMENT");
    }

    #[test]
    fn test_strict_mode_turns_warnings_into_errors() {
        let strict = Server::new(standard_registry(), true);
        let line = r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"call","arguments":{"function":"combine_measurements","args":[[10,12,5],[1,1,0],[0,0,1]]}}}"#;
        let r = respond(&strict, line);
        assert_eq!(r["result"]["isError"], true);
        assert_eq!(r["result"]["data"]["_error"]["code"], "ADVISORY");
        let r = respond(&server(), line);
        assert_eq!(r["result"]["isError"], false);
        assert!(r["result"]["data"]["warning"].as_str().unwrap().contains("upper limit"));
    }

    #[test]
    fn test_call_bad_params() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"call","arguments":{"function":"zero_point","args":"K"}}}"#);
        assert_eq!(r["error"]["code"], INVALID_PARAMS);
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"eval"}}"#);
        assert_eq!(r["error"]["code"], INVALID_PARAMS);
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":9,"method":"tools/call"}"#);
        assert_eq!(r["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_help_tool() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":10,"method":"tools/call","params":{"name":"help","arguments":{"name":"synthphot"}}}"#);
        let text = r["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("# synthphot"));
        assert_eq!(r["result"]["data"]["category"], "photometry");

        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":11,"method":"tools/call","params":{"name":"help"}}"#);
        assert!(r["result"]["data"]["functions"]["measure"].is_array());
    }

    #[test]
    fn test_list_functions_by_category() {
        let r = respond(&server(), r#"{"jsonrpc":"2.0","id":12,"method":"tools/call","params":{"name":"list_functions","arguments":{"category":"photometry"}}}"#);
        let names: Vec<&str> = r["result"]["data"].as_array().unwrap()
            .iter().map(|f| f["name"].as_str().unwrap()).collect();
        assert!(names.contains(&"simpson"));
        assert!(names.contains(&"synthphot"));
        assert!(!names.contains(&"convert_flux"));
    }
}
