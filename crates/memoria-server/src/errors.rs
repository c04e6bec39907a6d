use memoria_core::errors::MemoriaError;
use rmcp::ErrorData as McpError;

/// Maps the engine's error taxonomy onto MCP error kinds (spec §7):
/// precondition failures are the caller's fault, everything else is
/// this process's fault.
pub fn to_mcp_error(err: MemoriaError) -> McpError {
    if err.is_precondition_failure() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

pub fn invalid_params(msg: impl Into<String>) -> McpError {
    McpError::invalid_params(msg.into(), None)
}
