//! Tool definitions and the tool registry.
//!
//! A [`Tool`] pairs the definition advertised by `tools/list` with the
//! handler that runs on `tools/call`. The [`ToolRegistry`] holds every tool
//! the server exposes and is frozen once the server starts.

use crate::auth::RequestScope;
use crate::error::McpError;
use crate::params::Arguments;
use crate::protocol::{CallToolResult, ToolAnnotations, ToolDefinition};
use crate::schema::{ParamSpec, input_schema};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

/// Handler invoked for `tools/call`.
///
/// Handlers never fail at the protocol level: validation and backend
/// failures come back as a [`CallToolResult`] with `is_error` set.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn invoke(&self, scope: &RequestScope, arguments: &Arguments) -> CallToolResult;
}

#[async_trait]
impl<F, Fut> ToolHandler for F
where
    F: Fn(RequestScope, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = CallToolResult> + Send + 'static,
{
    async fn invoke(&self, scope: &RequestScope, arguments: &Arguments) -> CallToolResult {
        (self)(scope.clone(), arguments.clone()).await
    }
}

/// A tool exposed over MCP.
#[derive(Clone)]
pub struct Tool {
    definition: ToolDefinition,
    params: Vec<ParamSpec>,
    handler: Arc<dyn ToolHandler>,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        let definition = ToolDefinition {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema(&params),
            annotations: ToolAnnotations::default(),
        };
        Self {
            definition,
            params,
            handler: Arc::new(handler),
        }
    }

    /// Set the human readable title annotation.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.definition.annotations.title = Some(title.into());
        self
    }

    pub(crate) fn with_read_only_hint(mut self, read_only: bool) -> Self {
        self.definition.annotations.read_only_hint = Some(read_only);
        self
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Whether the tool is annotated as read-only.
    pub fn is_read_only(&self) -> bool {
        self.definition.annotations.read_only_hint == Some(true)
    }

    pub async fn invoke(&self, scope: &RequestScope, arguments: &Arguments) -> CallToolResult {
        self.handler.invoke(scope, arguments).await
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.definition.name)
            .field("params", &self.params.len())
            .finish_non_exhaustive()
    }
}

/// Registry of available MCP tools, ordered by name.
#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Tool) -> Result<(), McpError> {
        if self.tools.contains_key(tool.name()) {
            return Err(McpError::DuplicateTool {
                name: tool.name().to_string(),
            });
        }
        self.tools.insert(tool.name().to_string(), tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Definitions for `tools/list`.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
