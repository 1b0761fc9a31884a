//! Named groups of tools.
//!
//! Tools are organised into toolsets (`payments`, `orders`, ...). Each
//! toolset holds read tools and write tools separately so a read-only server
//! can drop every write tool in one place. Enabling is all-or-nothing: if
//! any requested toolset is unknown, nothing is enabled.

use crate::tools::{Tool, ToolRegistry};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while assembling toolsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolsetError {
    #[error("toolset {0} does not exist")]
    NotFound(String),

    #[error("toolset {0} is already registered")]
    Duplicate(String),

    #[error("tool {0} is already registered")]
    DuplicateTool(String),
}

/// A named group of read and write tools.
#[derive(Debug, Clone)]
pub struct Toolset {
    name: String,
    description: String,
    read_tools: Vec<Tool>,
    write_tools: Vec<Tool>,
    enabled: bool,
}

impl Toolset {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            read_tools: Vec::new(),
            write_tools: Vec::new(),
            enabled: false,
        }
    }

    /// Add tools that only read data. They are annotated `readOnlyHint: true`.
    pub fn add_read_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.read_tools
            .extend(tools.into_iter().map(|t| t.with_read_only_hint(true)));
        self
    }

    /// Add tools that create or modify data. They are annotated `readOnlyHint: false`.
    pub fn add_write_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.write_tools
            .extend(tools.into_iter().map(|t| t.with_read_only_hint(false)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn read_tools(&self) -> &[Tool] {
        &self.read_tools
    }

    pub fn write_tools(&self) -> &[Tool] {
        &self.write_tools
    }

    /// Tools this toolset contributes under the given mode.
    pub fn active_tools(&self, read_only: bool) -> impl Iterator<Item = &Tool> {
        let writes: &[Tool] = if read_only { &[] } else { &self.write_tools };
        self.read_tools.iter().chain(writes.iter())
    }
}

/// The set of known toolsets plus the read-only switch.
#[derive(Debug, Clone, Default)]
pub struct ToolsetGroup {
    toolsets: BTreeMap<String, Toolset>,
    read_only: bool,
}

impl ToolsetGroup {
    pub fn new(read_only: bool) -> Self {
        Self {
            toolsets: BTreeMap::new(),
            read_only,
        }
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn add_toolset(&mut self, toolset: Toolset) -> Result<(), ToolsetError> {
        if self.toolsets.contains_key(toolset.name()) {
            return Err(ToolsetError::Duplicate(toolset.name.clone()));
        }
        self.toolsets.insert(toolset.name.clone(), toolset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Toolset> {
        self.toolsets.get(name)
    }

    pub fn toolsets(&self) -> impl Iterator<Item = &Toolset> {
        self.toolsets.values()
    }

    /// Enable the named toolsets, or every toolset when `names` is empty.
    ///
    /// All names are checked before anything is enabled.
    pub fn enable_toolsets<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ToolsetError> {
        if names.is_empty() {
            for toolset in self.toolsets.values_mut() {
                toolset.enabled = true;
            }
            tracing::info!(count = self.toolsets.len(), "Enabled all toolsets");
            return Ok(());
        }

        if let Some(unknown) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|name| !self.toolsets.contains_key(*name))
        {
            return Err(ToolsetError::NotFound(unknown.to_string()));
        }

        for name in names {
            if let Some(toolset) = self.toolsets.get_mut(name.as_ref()) {
                toolset.enabled = true;
                tracing::info!(toolset = %toolset.name, "Enabled toolset");
            }
        }
        Ok(())
    }

    pub fn enabled_names(&self) -> Vec<&str> {
        self.toolsets
            .values()
            .filter(|t| t.enabled)
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Register the tools of every enabled toolset.
    ///
    /// Write tools are skipped in read-only mode. Returns the number of tools
    /// registered.
    pub fn register_tools(&self, registry: &mut ToolRegistry) -> Result<usize, ToolsetError> {
        let mut count = 0;
        for toolset in self.toolsets.values().filter(|t| t.enabled) {
            for tool in toolset.active_tools(self.read_only) {
                tracing::debug!(tool = tool.name(), toolset = %toolset.name, "Registering tool");
                registry
                    .register(tool.clone())
                    .map_err(|_| ToolsetError::DuplicateTool(tool.name().to_string()))?;
                count += 1;
            }
            if self.read_only && !toolset.write_tools.is_empty() {
                tracing::debug!(
                    toolset = %toolset.name,
                    skipped = toolset.write_tools.len(),
                    "Read-only mode, write tools not registered"
                );
            }
        }
        Ok(count)
    }
}
