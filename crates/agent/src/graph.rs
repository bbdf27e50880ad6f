//! Agent graph types

use std::sync::Arc;

use voice_sales_tools::Tool;

use crate::AgentError;

/// A named conversational role with an instruction script, bound tools,
/// and directed hand-off edges. Immutable once the graph is built.
pub struct AgentNode {
    name: String,
    handoff_description: Option<String>,
    instructions: String,
    tools: Vec<Arc<dyn Tool>>,
    handoffs: Vec<String>,
}

impl AgentNode {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handoff_description: None,
            instructions: instructions.into(),
            tools: Vec::new(),
            handoffs: Vec::new(),
        }
    }

    /// Description shown to other roles considering a hand-off here.
    pub fn handoff_description(mut self, description: impl Into<String>) -> Self {
        self.handoff_description = Some(description.into());
        self
    }

    /// Bind a tool to this role.
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add a directed hand-off edge to another role.
    pub fn handoff_to(mut self, target: impl Into<String>) -> Self {
        self.handoffs.push(target.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn handoff_description_text(&self) -> Option<&str> {
        self.handoff_description.as_deref()
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn handoffs(&self) -> &[String] {
        &self.handoffs
    }
}

impl std::fmt::Debug for AgentNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentNode")
            .field("name", &self.name)
            .field("tools", &self.tool_names())
            .field("handoffs", &self.handoffs)
            .finish()
    }
}

/// The immutable role graph for one session.
#[derive(Debug)]
pub struct AgentGraph {
    nodes: Vec<AgentNode>,
    root: String,
}

impl AgentGraph {
    /// Build and validate a graph: unique node names, existing root, and
    /// every hand-off edge pointing at a real node.
    pub fn new(root: impl Into<String>, nodes: Vec<AgentNode>) -> Result<Self, AgentError> {
        let root = root.into();

        for (i, node) in nodes.iter().enumerate() {
            if nodes[..i].iter().any(|n| n.name == node.name) {
                return Err(AgentError::DuplicateNode(node.name.clone()));
            }
        }

        if !nodes.iter().any(|n| n.name == root) {
            return Err(AgentError::UnknownRoot(root));
        }

        for node in &nodes {
            for target in &node.handoffs {
                if !nodes.iter().any(|n| &n.name == target) {
                    return Err(AgentError::UnknownHandoffTarget {
                        from: node.name.clone(),
                        to: target.clone(),
                    });
                }
            }
        }

        Ok(Self { nodes, root })
    }

    /// The entry role for the conversation.
    pub fn root(&self) -> &AgentNode {
        // Validated at construction.
        self.nodes.iter().find(|n| n.name == self.root).expect("root node exists")
    }

    pub fn node(&self, name: &str) -> Option<&AgentNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn nodes(&self) -> &[AgentNode] {
        &self.nodes
    }

    /// All hand-off edges as (from, to) pairs.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|n| n.handoffs.iter().map(move |t| (n.name.as_str(), t.as_str())))
            .collect()
    }
}
