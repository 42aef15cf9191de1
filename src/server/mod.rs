//! MCP server over newline-delimited JSON-RPC on stdio.
//!
//! # Architecture
//!
//! ```text
//! stdin ─► read loop ─► spawn per request ─► McpServer::handle_message
//!                                                 │
//! stdout ◄─ writer task ◄─ mpsc ◄─────────────────┘
//! ```
//!
//! Every request runs in its own task: a break stalled behind the boss
//! alert delay must not stop the server from reading further requests.
//! Responses are funnelled through a single writer so frames never
//! interleave. Responses may therefore arrive out of request order, which
//! JSON-RPC allows.

pub mod protocol;

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{ChillError, Result};
use crate::response::{BreakReport, ToolCallResult};
use crate::state::StateEngine;
use crate::tools::BreakTool;
use protocol::{JsonRpcRequest, JsonRpcResponse, ToolCallParams, PROTOCOL_VERSION};

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "ChillMCP";

/// Dispatches MCP requests to the break tools.
#[derive(Debug, Clone)]
pub struct McpServer {
    engine: Arc<StateEngine>,
}

impl McpServer {
    /// Create a server driving `engine`.
    #[must_use]
    pub fn new(engine: Arc<StateEngine>) -> Self {
        Self { engine }
    }

    /// The engine behind this server.
    #[must_use]
    pub fn engine(&self) -> &Arc<StateEngine> {
        &self.engine
    }

    /// Handle one raw frame. Returns `None` for notifications.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Dropping unparseable frame: {}", e);
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    &ChillError::parse(e.to_string()),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(request) => request,
            Err(e) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                return Some(JsonRpcResponse::failure(
                    id,
                    &ChillError::invalid_request(e.to_string()),
                ));
            }
        };

        let outcome = if request.jsonrpc == protocol::JSONRPC_VERSION {
            self.dispatch(&request).await
        } else {
            Err(ChillError::invalid_request(format!(
                "unsupported jsonrpc version '{}'",
                request.jsonrpc
            )))
        };

        if let Err(e) = &outcome {
            if e.is_client_error() {
                debug!(method = %request.method, "Request failed: {}", e);
            } else {
                error!(method = %request.method, "Request failed: {}", e);
            }
        }

        if request.is_notification() {
            return None;
        }
        let id = request.id.unwrap_or_default();
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::failure(id, &e),
        })
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> Result<Value> {
        match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
            })),
            "notifications/initialized" => {
                debug!("Client initialized");
                Ok(Value::Null)
            }
            "ping" => Ok(json!({})),
            "tools/list" => {
                let tools: Vec<_> = BreakTool::ALL.iter().map(BreakTool::descriptor).collect();
                Ok(json!({ "tools": tools }))
            }
            "tools/call" => self.call_tool(request.params.clone()).await,
            other => Err(ChillError::method_not_found(other)),
        }
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params: ToolCallParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| ChillError::invalid_argument("params", e.to_string()))?;
        let tool: BreakTool = params.name.parse()?;

        let outcome = tool.invoke(&self.engine).await;
        if let Ok(report) = &outcome {
            info!(tool = %tool, levels = %report.levels, "Break taken");
        }
        tool_result(outcome)
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Returns once the input is exhausted and every in-flight request has
    /// been answered.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input fails.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer_task = tokio::spawn(write_responses(rx, writer));

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_message(&line).await {
                    // the writer only goes away once every sender is dropped
                    let _ = tx.send(response);
                }
            });
        }

        info!("Input closed, draining in-flight requests");
        drop(tx);
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(ChillError::Other(anyhow::anyhow!("writer task failed: {e}"))),
        }
    }
}

/// Wrap a tool outcome for `tools/call`.
///
/// Caller mistakes stay JSON-RPC errors. Anything else went wrong inside
/// the tool and is reported in the result with `isError` set.
fn tool_result(outcome: Result<BreakReport>) -> Result<Value> {
    let result = match outcome {
        Ok(report) => ToolCallResult::from_report(&report),
        Err(e) if e.is_client_error() => return Err(e),
        Err(e) => ToolCallResult::error(e.to_string()),
    };
    Ok(serde_json::to_value(result)?)
}

async fn write_responses<W>(
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
    mut writer: W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut frame = serde_json::to_vec(&response)?;
        frame.push(b'\n');
        if let Err(e) = writer.write_all(&frame).await {
            error!("Failed to write response: {}", e);
            return Err(e.into());
        }
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::response::parse_levels;
    use crate::state::{Levels, StateSnapshot};
    use crate::testing::ScriptedEscalation;
    use chrono::Utc;
    use std::time::Duration;
    use tokio::io::BufReader;

    fn server_with(decider: ScriptedEscalation) -> McpServer {
        let engine = StateEngine::new(EngineConfig::default()).with_decider(decider);
        McpServer::new(Arc::new(engine))
    }

    fn result_text(response: &JsonRpcResponse) -> String {
        response.result.as_ref().unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "ChillMCP");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_tools_list_has_every_tool() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 11);
        assert!(tools.iter().any(|t| t["name"] == "take_a_break"));
        assert!(tools.iter().any(|t| t["name"] == "company_dinner"));
    }

    #[tokio::test]
    async fn test_tools_call_applies_break() {
        let server = server_with(ScriptedEscalation::always(true));
        let resp = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"immediate_leave","arguments":{}}}"#,
            )
            .await
            .unwrap();
        assert!(resp.is_success());

        let text = result_text(&resp);
        assert!(text.starts_with("🏃 Leaving work immediately - "));
        assert_eq!(parse_levels(&text), Some(Levels::new(0, 1)));
        assert_eq!(server.engine().get_snapshot().await, Levels::new(0, 1));
    }

    #[tokio::test]
    async fn test_null_id_request_is_answered() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":null,"method":"tools/call","params":{"name":"immediate_leave"}}"#,
            )
            .await
            .unwrap();
        assert!(resp.id.is_null());
        assert!(resp.is_success());
        assert_eq!(parse_levels(&result_text(&resp)), Some(Levels::new(0, 0)));
        assert_eq!(server.engine().get_snapshot().await, Levels::new(0, 0));
    }

    #[test]
    fn test_tool_failure_is_reported_in_result() {
        let result = tool_result(Err(ChillError::Other(anyhow::anyhow!("engine gone")))).unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("engine gone"));
    }

    #[test]
    fn test_tool_argument_error_stays_protocol_error() {
        let err = tool_result(Err(ChillError::invalid_argument("stress_decrease", "negative")))
            .unwrap_err();
        assert_eq!(err.json_rpc_code(), -32602);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"nap"}}"#,
            )
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, -32602);
        assert_eq!(server.engine().get_snapshot().await, Levels::new(50, 0));
    }

    #[tokio::test]
    async fn test_missing_call_params_is_invalid_params() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":5,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, json!(5));
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server.handle_message("{not json").await.unwrap();
        assert!(resp.id.is_null());
        assert_eq!(resp.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_missing_method_is_invalid_request() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(r#"{"jsonrpc":"2.0","id":9}"#)
            .await
            .unwrap();
        assert_eq!(resp.id, json!(9));
        assert_eq!(resp.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let server = server_with(ScriptedEscalation::always(false));
        let resp = server
            .handle_message(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_serve_answers_each_request() {
        let server = server_with(ScriptedEscalation::always(false));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n",
        );
        let (client, server_end) = tokio::io::duplex(64 * 1024);

        server
            .serve(BufReader::new(input.as_bytes()), server_end)
            .await
            .unwrap();

        let mut lines = BufReader::new(client).lines();
        let mut ids = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            let resp: JsonRpcResponse = serde_json::from_str(&line).unwrap();
            assert!(resp.is_success());
            ids.push(resp.id);
        }
        ids.sort_by_key(|id| id.as_i64());
        assert_eq!(ids, vec![json!(1), json!(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_serve_keeps_reading_while_break_stalls() {
        let snapshot = StateSnapshot::new(80, 5, Utc::now());
        let engine = StateEngine::with_state(EngineConfig::default(), snapshot)
            .with_decider(ScriptedEscalation::always(false));
        let server = McpServer::new(Arc::new(engine));

        let (mut client_tx, server_rx) = tokio::io::duplex(64 * 1024);
        let (server_tx, client_rx) = tokio::io::duplex(64 * 1024);
        let serving = tokio::spawn({
            let server = server.clone();
            async move { server.serve(BufReader::new(server_rx), server_tx).await }
        });

        client_tx
            .write_all(
                b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"take_a_break\"}}\n\
                  {\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n",
            )
            .await
            .unwrap();

        // ping is answered long before the 20s stall ends
        let mut lines = BufReader::new(client_rx).lines();
        let first = lines.next_line().await.unwrap().unwrap();
        let first: JsonRpcResponse = serde_json::from_str(&first).unwrap();
        assert_eq!(first.id, json!(2));

        tokio::time::sleep(Duration::from_secs(30)).await;
        let second = lines.next_line().await.unwrap().unwrap();
        let second: JsonRpcResponse = serde_json::from_str(&second).unwrap();
        assert_eq!(second.id, json!(1));
        assert!(parse_levels(&result_text(&second)).unwrap().stress < 80);

        drop(client_tx);
        serving.await.unwrap().unwrap();
    }
}
