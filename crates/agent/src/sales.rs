//! The two-role sales graph

use voice_sales_tools::SalesToolset;

use crate::graph::{AgentGraph, AgentNode};
use crate::AgentError;

/// Entry role: collects data, drives the close, ends the call.
pub const PRIMARY_AGENT: &str = "sales_agent";

/// Consulted role: recommends cars from catalog and past feedback.
pub const SPECIALIST_AGENT: &str = "car_recommender";

const PRIMARY_INSTRUCTIONS: &str = "\
You are a car sales agent. Collect the customer's details and preferences, \
then use the car recommendation specialist to suggest a car. Be concise to \
close the sale as fast as possible. The flow is:
- Greet the customer.
- Ask for basic details (name, age, budget).
- Ask how many people usually travel in the car.
- Ask whether they are looking for something economical, sporty, or family-oriented.
- Confirm what the customer is looking for.
- Call set_personal_data to store the data after each new fact you learn.
- Hand off to the car recommender to suggest a car based on the answers.
- After a car has been recommended, ask: \"How useful did you find this recommendation, from 1 to 5?\"
- If the customer wants to move forward, call schedule_appointment to book a visit.
- Use the customer's reaction to adjust future suggestions (for example, if they say \
\"too expensive\", prioritize cheaper cars next time).
- When the conversation has concluded, say goodbye and call end_call.
- Always keep a professional, clear tone oriented to a fast close.";

const SPECIALIST_INSTRUCTIONS: &str = "\
Recommend cars from the dealership catalog.
- Call get_car_catalog to see what is available before recommending.
- Call find_similar_feedback to consider feedback from similar past customers \
(families, singles, etc.).
- Ask questions to understand needs before recommending.
- The stated budget is approximate: look for cars within a range of ±15% of it.
- Always offer cars appropriate to the customer's profile and seating capacity.
- Once the customer reacts to a recommendation, call save_user_feedback with \
their feedback and rating.";

/// Build the session's role graph: the primary sales role with a single
/// hand-off edge to the recommendation specialist.
pub fn build_sales_graph(toolset: &SalesToolset) -> Result<AgentGraph, AgentError> {
    let specialist = AgentNode::new(SPECIALIST_AGENT, SPECIALIST_INSTRUCTIONS)
        .handoff_description("Specialist agent for car recommendations")
        .tool(toolset.get_catalog.clone())
        .tool(toolset.find_similar.clone())
        .tool(toolset.save_feedback.clone());

    let primary = AgentNode::new(PRIMARY_AGENT, PRIMARY_INSTRUCTIONS)
        .tool(toolset.set_personal_data.clone())
        .tool(toolset.schedule_appointment.clone())
        .tool(toolset.end_call.clone())
        .handoff_to(SPECIALIST_AGENT);

    AgentGraph::new(PRIMARY_AGENT, vec![primary, specialist])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use voice_sales_core::{ReadinessGate, SessionEvents, TerminationRequestor};
    use voice_sales_persistence::MemoryFeedbackStore;
    use voice_sales_rag::HashEmbedder;
    use voice_sales_tools::{build_toolset, ToolContext};

    fn graph() -> AgentGraph {
        let (terminator, _rx) = TerminationRequestor::channel();
        let toolset = build_toolset(ToolContext {
            gate: ReadinessGate::new(),
            events: SessionEvents::new(),
            store: Arc::new(MemoryFeedbackStore::new(8)),
            embedder: Arc::new(HashEmbedder::new(8)),
            terminator,
        });
        build_sales_graph(&toolset).unwrap()
    }

    #[test]
    fn test_graph_shape_two_nodes_one_edge() {
        let graph = graph();
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges(), vec![(PRIMARY_AGENT, SPECIALIST_AGENT)]);
        assert_eq!(graph.root().name(), PRIMARY_AGENT);
    }

    #[test]
    fn test_primary_binds_capture_and_termination() {
        let graph = graph();
        let names = graph.root().tool_names();
        assert_eq!(names, ["set_personal_data", "schedule_appointment", "end_call"]);
    }

    #[test]
    fn test_specialist_binds_catalog_retrieval_feedback() {
        let graph = graph();
        let specialist = graph.node(SPECIALIST_AGENT).unwrap();
        assert_eq!(
            specialist.tool_names(),
            ["get_car_catalog", "find_similar_feedback", "save_user_feedback"]
        );
        assert!(specialist.handoffs().is_empty());
        assert_eq!(
            specialist.handoff_description_text(),
            Some("Specialist agent for car recommendations")
        );
    }
}
