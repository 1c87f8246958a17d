use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::{debug, error};

use arlo_store::SqliteStore;

use crate::exports::ExportDir;
use crate::protocol::{JsonRpcMessage, JsonRpcResponse};
use crate::tools;

const SERVER_NAME: &str = "arlo";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Run the MCP server on stdio. Blocks until stdin is closed.
pub fn run_server(store: &SqliteStore, exports: &ExportDir) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let msg: JsonRpcMessage = match serde_json::from_str(line) {
            Ok(m) => m,
            Err(e) => {
                error!("invalid JSON-RPC: {e}");
                let resp = JsonRpcResponse::err(Value::Null, -32700, format!("parse error: {e}"));
                write_response(&mut stdout, &resp)?;
                continue;
            }
        };

        let method = msg.method.as_deref().unwrap_or("");
        debug!("MCP request: {method}");

        // Notifications carry no id and get no response
        let id = match msg.id {
            Some(id) => id,
            None => continue,
        };

        let response = match method {
            "initialize" => handle_initialize(id),
            "ping" => JsonRpcResponse::ok(id, json!({})),
            "tools/list" => JsonRpcResponse::ok(id, tools::tool_definitions()),
            "tools/call" => handle_tools_call(id, &msg.params, store, exports),
            other => JsonRpcResponse::method_not_found(id, other),
        };

        write_response(&mut stdout, &response)?;
    }

    Ok(())
}

fn write_response(stdout: &mut io::Stdout, resp: &JsonRpcResponse) -> anyhow::Result<()> {
    let json = serde_json::to_string(resp)?;
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}

fn handle_initialize(id: Value) -> JsonRpcResponse {
    JsonRpcResponse::ok(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "instructions": ARLO_INSTRUCTIONS
        }),
    )
}

const ARLO_INSTRUCTIONS: &str = "\
Arlo logs and reviews gym workouts. Stick to tool output; never invent data.\n\
\n\
LOG (log_workout): call exactly once per workout with one `workout` object:\n\
{\"workout_date\": \"YYYY-MM-DD|today|yesterday|tomorrow\", \"notes\": \"optional\",\n\
 \"entries\": [{\"exercise_name\": \"Bench Press\",\n\
   \"sets\": [{\"set_number\": 1, \"reps\": 8, \"weight\": 60, \"notes\": \"optional\"}]}]}\n\
If the user gave no date, use `today`. Keep the exercises the user named; do not\n\
invent extras. Each set needs at least one of reps/weight/duration_minutes/\n\
distance_km; ask one short follow-up instead of guessing missing numbers.\n\
\n\
PROGRESS (get_exercise_progress): date-ordered set history for one exercise.\n\
Include the dates when summarizing.\n\
\n\
LAST (get_last_workout): most recent workout with all its sets, one row per set.\n\
\n\
DELETE (delete_last_workout): destructive; call with confirm=true only after\n\
the user has asked to delete.\n\
\n\
SAVE (save_to_md_file / save_to_txt_file): file naming is handled internally;\n\
never ask the user for a filename. Reply with the returned path.";

fn handle_tools_call(
    id: Value,
    params: &Option<Value>,
    store: &SqliteStore,
    exports: &ExportDir,
) -> JsonRpcResponse {
    let params = match params {
        Some(p) => p,
        None => {
            return JsonRpcResponse::invalid_params(id, "missing params");
        }
    };

    let tool_name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n,
        None => {
            return JsonRpcResponse::invalid_params(id, "missing tool name");
        }
    };

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    let result = tools::call_tool(store, exports, tool_name, &args);
    JsonRpcResponse::ok(id, serde_json::to_value(result).unwrap_or(json!(null)))
}
