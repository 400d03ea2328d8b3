use crate::commands::Out;
use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{error, warn};

/// The message followed, when there is one, by the structured output as JSON.
pub(super) fn to_content<T>(out: Out<T>) -> Vec<Content>
where
    T: Debug + Clone + Serialize,
{
    let mut content = vec![Content::text(out.message())];
    if let Some(object) = out.structure() {
        match Content::json(object) {
            Ok(json) => content.push(json),
            Err(e) => error!("Unable to serialize JSON output: {e}"),
        };
    }
    content
}

/// Command failures are reported to the agent as tool errors rather than protocol errors, so that
/// it can read the message and try again.
pub(super) fn tool_result<T>(result: crate::Result<Out<T>>) -> Result<CallToolResult, ErrorData>
where
    T: Debug + Clone + Serialize,
{
    Ok(match result {
        Ok(out) => CallToolResult::success(to_content(out)),
        Err(e) => {
            warn!("MCP tool failed with a {} error", e.error_type());
            CallToolResult::error(vec![Content::text(e.to_string())])
        }
    })
}
