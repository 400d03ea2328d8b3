//! The MCP tools. Each one is a thin wrapper around the command of the same name.

use crate::args::{OwedArgs, RemindArgs, StatusArgs};
use crate::commands;
use crate::mcp::mcp_utils::tool_result;
use crate::mcp::DuesServer;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use rmcp::{tool, tool_router};
use tracing::info;

#[tool_router(vis = "pub(super)")]
impl DuesServer {
    #[tool]
    /// Initialize the dues MCP service for this session and return usage instructions. You
    /// **MUST** call this **ONCE** before using other tools so that you have the full usage
    /// instructions. You **MAY** call it more than once if you have forgotten the usage
    /// instructions.
    async fn initialize_service(&self) -> Result<CallToolResult, McpError> {
        let mut initialized = self.initialized.lock().await;
        *initialized = true;
        Ok(CallToolResult::success(vec![rmcp::model::Content::text(
            include_str!("docs/INSTRUCTIONS.md"),
        )]))
    }

    /// List every billing period in the payment sheet, oldest first, with its label (e.g.
    /// `Mar 24`), start date, fee, and whether it is the first period at a new fee.
    #[tool]
    async fn periods(&self) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: periods called");
        tool_result(commands::periods(&self.config, self.mode).await)
    }

    /// Show every member's standing: the period they have paid until (or "no payment on record",
    /// or "fully settled"), the height of their bar in the payment chart, and what they owe.
    ///
    /// # Parameters
    ///
    /// - `include_current`: Whether the period that has already started is charged. When omitted,
    ///   the configured default applies.
    /// - `as_of`: Compute as if today were this date (`YYYY-MM-DD`). Defaults to today.
    ///
    /// # Example
    ///
    /// ```json
    /// {}
    /// ```
    #[tool]
    async fn status(
        &self,
        Parameters(args): Parameters<StatusArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: status called");
        tool_result(commands::status(&self.config, self.mode, &args).await)
    }

    /// Work out how much one member owes.
    ///
    /// # Parameters
    ///
    /// - `member`: The member's name, exactly as it appears in the sheet. Case matters.
    /// - `include_current`: Whether the period that has already started is charged. When omitted,
    ///   the configured default applies.
    /// - `as_of`: Compute as if today were this date (`YYYY-MM-DD`). Defaults to today.
    ///
    /// # Example
    ///
    /// ```json
    /// { "member": "Eleni", "include_current": false }
    /// ```
    #[tool]
    async fn owed(
        &self,
        Parameters(args): Parameters<OwedArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: owed called for {}", args.member);
        tool_result(commands::owed(&self.config, self.mode, &args).await)
    }

    /// Ask for an email reminder when a member's next payment is due. The request is forwarded
    /// to the configured reminder endpoint and does not change what anyone owes.
    ///
    /// # Example
    ///
    /// ```json
    /// { "member": "Eleni", "email": "eleni@example.com" }
    /// ```
    #[tool]
    async fn remind(
        &self,
        Parameters(args): Parameters<RemindArgs>,
    ) -> Result<CallToolResult, McpError> {
        require_init!(self);
        info!("MCP: remind called for {}", args.member);
        tool_result(commands::remind(&self.config, self.mode, &args).await)
    }
}
