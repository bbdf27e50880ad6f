//! Sales-call tools
//!
//! The six tools the model runtime can invoke during a call. Each one
//! awaits the session readiness gate before its first externally visible
//! effect: the runtime may call a tool the instant the graph exists, but
//! nothing leaves the process until the data channel is confirmed open.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use voice_sales_catalog::{get_catalog, CATEGORY_LABELS};
use voice_sales_core::{PersonalData, ReadinessGate, SessionEvents, TerminationRequestor};
use voice_sales_persistence::{FeedbackStore, NewFeedback};
use voice_sales_rag::{EmbeddingProvider, FeedbackSearch, RagError, TOP_K};

use crate::mcp::{InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};
use crate::registry::ToolRegistry;

/// Collaborators shared by the session's tools.
///
/// Built per session by the session factory; no tool state is
/// process-global.
#[derive(Clone)]
pub struct ToolContext {
    pub gate: ReadinessGate,
    pub events: SessionEvents,
    pub store: Arc<dyn FeedbackStore>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub terminator: TerminationRequestor,
}

/// The session's tool set, one instance per call.
#[derive(Clone)]
pub struct SalesToolset {
    pub get_catalog: Arc<dyn Tool>,
    pub set_personal_data: Arc<dyn Tool>,
    pub save_feedback: Arc<dyn Tool>,
    pub find_similar: Arc<dyn Tool>,
    pub schedule_appointment: Arc<dyn Tool>,
    pub end_call: Arc<dyn Tool>,
}

impl SalesToolset {
    /// A registry over every tool in the set.
    pub fn registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for tool in [
            &self.get_catalog,
            &self.set_personal_data,
            &self.save_feedback,
            &self.find_similar,
            &self.schedule_appointment,
            &self.end_call,
        ] {
            registry.register(tool.clone());
        }
        registry
    }
}

/// Build the full tool set for one session.
pub fn build_toolset(ctx: ToolContext) -> SalesToolset {
    let search = FeedbackSearch::new(ctx.store.clone(), ctx.embedder.clone());

    SalesToolset {
        get_catalog: Arc::new(GetCarCatalogTool {
            gate: ctx.gate.clone(),
        }),
        set_personal_data: Arc::new(SetPersonalDataTool {
            gate: ctx.gate.clone(),
            events: ctx.events.clone(),
        }),
        save_feedback: Arc::new(SaveUserFeedbackTool {
            gate: ctx.gate.clone(),
            store: ctx.store,
            embedder: ctx.embedder,
        }),
        find_similar: Arc::new(FindSimilarFeedbackTool {
            gate: ctx.gate.clone(),
            search: Arc::new(search),
        }),
        schedule_appointment: Arc::new(ScheduleAppointmentTool {
            gate: ctx.gate.clone(),
        }),
        end_call: Arc::new(EndCallTool {
            gate: ctx.gate,
            terminator: ctx.terminator,
        }),
    }
}

fn str_field(input: &Value, name: &str) -> Result<String, ToolError> {
    input
        .get(name)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ToolError::invalid_params(format!("{} is required", name)))
}

fn u32_field(input: &Value, name: &str) -> Result<u32, ToolError> {
    input
        .get(name)
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ToolError::invalid_params(format!("{} is required", name)))
}

fn f64_field(input: &Value, name: &str) -> Result<f64, ToolError> {
    input
        .get(name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ToolError::invalid_params(format!("{} is required", name)))
}

/// Return the full car catalog.
pub struct GetCarCatalogTool {
    gate: ReadinessGate,
}

#[async_trait]
impl Tool for GetCarCatalogTool {
    fn name(&self) -> &str {
        "get_car_catalog"
    }

    fn description(&self) -> &str {
        "Return the list of cars available for sale"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object(),
        }
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput, ToolError> {
        self.gate.subscribe().wait().await;
        Ok(ToolOutput::json(get_catalog()))
    }
}

/// Forward a personal data snapshot to the hosting UI.
pub struct SetPersonalDataTool {
    gate: ReadinessGate,
    events: SessionEvents,
}

#[async_trait]
impl Tool for SetPersonalDataTool {
    fn name(&self) -> &str {
        "set_personal_data"
    }

    fn description(&self) -> &str {
        "Store the personal data of the customer such as name, age, budget, and preferences"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("name", PropertySchema::string("The name of the customer"), true)
                .property("phone", PropertySchema::string("The customer's phone number"), false)
                .property(
                    "age",
                    PropertySchema::integer("The age of the customer").with_minimum(1.0),
                    true,
                )
                .property(
                    "budget",
                    PropertySchema::number("The budget of the customer in USD").with_minimum(0.0),
                    true,
                )
                .property(
                    "capacity",
                    PropertySchema::integer("Number of people that usually travel in the car")
                        .with_minimum(1.0),
                    true,
                )
                .property(
                    "car_type",
                    PropertySchema::enum_type(
                        "The preferred car category",
                        CATEGORY_LABELS.iter().map(|s| s.to_string()).collect(),
                    ),
                    true,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        self.gate.subscribe().wait().await;

        let data = PersonalData {
            name: str_field(&input, "name")?,
            phone: input
                .get("phone")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            age: u32_field(&input, "age")?,
            budget: f64_field(&input, "budget")?,
            capacity: u32_field(&input, "capacity")?,
            car_type: str_field(&input, "car_type")?,
        };

        data.validate()
            .map_err(|e| ToolError::invalid_params(e.to_string()))?;

        let name = data.name.clone();
        // Panics inside the host callback are contained by emit.
        self.events.emit_personal_data(data);

        Ok(ToolOutput::text(format!("Personal data stored for {}.", name)))
    }
}

/// Persist customer feedback with its embedding.
pub struct SaveUserFeedbackTool {
    gate: ReadinessGate,
    store: Arc<dyn FeedbackStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

#[async_trait]
impl Tool for SaveUserFeedbackTool {
    fn name(&self) -> &str {
        "save_user_feedback"
    }

    fn description(&self) -> &str {
        "Store the customer's feedback about a recommendation"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("name", PropertySchema::string("The name of the customer"), true)
                .property(
                    "age",
                    PropertySchema::integer("The age of the customer").with_minimum(1.0),
                    true,
                )
                .property(
                    "budget",
                    PropertySchema::number("The budget of the customer in USD").with_minimum(0.0),
                    true,
                )
                .property(
                    "capacity",
                    PropertySchema::integer("Number of people that usually travel in the car")
                        .with_minimum(1.0),
                    true,
                )
                .property(
                    "car_type",
                    PropertySchema::enum_type(
                        "The preferred car category",
                        CATEGORY_LABELS.iter().map(|s| s.to_string()).collect(),
                    ),
                    true,
                )
                .property(
                    "feedback",
                    PropertySchema::string("The feedback provided by the customer"),
                    true,
                )
                .property(
                    "rating",
                    PropertySchema::integer("Numeric rating from 1 (bad) to 5 (excellent)")
                        .with_range(1.0, 5.0),
                    false,
                )
                .property(
                    "duration_seconds",
                    PropertySchema::integer("Call duration in seconds").with_minimum(0.0),
                    false,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        self.gate.subscribe().wait().await;

        let name = str_field(&input, "name")?;
        let age = u32_field(&input, "age")?;
        let budget = f64_field(&input, "budget")?;
        let capacity = u32_field(&input, "capacity")?;
        let car_type = str_field(&input, "car_type")?;
        let feedback = str_field(&input, "feedback")?;
        let rating = input
            .get("rating")
            .and_then(|v| v.as_u64())
            .and_then(|n| u8::try_from(n).ok());
        let duration_seconds = input
            .get("duration_seconds")
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok());

        let text = NewFeedback::canonical_text(&name, age, budget, capacity, &car_type, &feedback);

        let embedding = self
            .embedder
            .embed(&text)
            .await
            .map_err(|e| ToolError::internal(e.to_string()))?;

        self.store
            .insert(NewFeedback {
                name: name.clone(),
                age,
                budget,
                capacity,
                car_type,
                feedback,
                rating,
                duration_seconds,
                text,
                embedding,
            })
            .await
            .map_err(|e| ToolError::internal(e.to_string()))?;

        Ok(ToolOutput::text(format!(
            "Thank you, {}. We appreciate your feedback.",
            name
        )))
    }
}

/// Retrieve the most similar historical feedback.
pub struct FindSimilarFeedbackTool {
    gate: ReadinessGate,
    search: Arc<FeedbackSearch>,
}

#[async_trait]
impl Tool for FindSimilarFeedbackTool {
    fn name(&self) -> &str {
        "find_similar_feedback"
    }

    fn description(&self) -> &str {
        "Find feedback from past customers most similar to a description of the current one"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object().property(
                "query",
                PropertySchema::string("Free-text description of the customer or situation"),
                true,
            ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        self.gate.subscribe().wait().await;

        let query = str_field(&input, "query")?;

        let matches = match self.search.find_similar(&query, TOP_K).await {
            Ok(matches) => matches,
            Err(RagError::Similarity(msg)) => {
                // Undefined similarity is a retrieval failure, not a score.
                tracing::warn!(error = %msg, "Similarity undefined for query");
                return Ok(ToolOutput::text("No similar feedback found."));
            }
            Err(e) => return Err(ToolError::internal(e.to_string())),
        };

        if matches.is_empty() {
            return Ok(ToolOutput::text("No similar feedback found."));
        }

        let mut lines = vec!["Most similar past feedback:".to_string()];
        for (rank, scored) in matches.iter().enumerate() {
            lines.push(format!(
                "{}. {} ({}, similarity {}): {}",
                rank + 1,
                scored.record.name,
                scored.record.car_type,
                scored.display_score(),
                scored.record.feedback,
            ));
        }

        Ok(ToolOutput::text(lines.join("\n")))
    }
}

/// Schedule an appointment with a human sales agent.
///
/// No persistence here; a real scheduling system sits behind this
/// confirmation in production.
pub struct ScheduleAppointmentTool {
    gate: ReadinessGate,
}

#[async_trait]
impl Tool for ScheduleAppointmentTool {
    fn name(&self) -> &str {
        "schedule_appointment"
    }

    fn description(&self) -> &str {
        "Schedule an appointment with a sales agent based on the customer's preferences and availability"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("name", PropertySchema::string("The name of the customer"), true)
                .property(
                    "date",
                    PropertySchema::string("The preferred date for the appointment"),
                    true,
                )
                .property(
                    "time",
                    PropertySchema::string("The preferred time for the appointment"),
                    true,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        self.gate.subscribe().wait().await;

        let name = str_field(&input, "name")?;
        let date = str_field(&input, "date")?;
        let time = str_field(&input, "time")?;

        tracing::info!(customer = %name, %date, %time, "Appointment requested");

        Ok(ToolOutput::text(format!(
            "Appointment scheduled for {} on {} at {}.",
            name, date, time
        )))
    }
}

/// End the call by requesting session teardown.
pub struct EndCallTool {
    gate: ReadinessGate,
    terminator: TerminationRequestor,
}

#[async_trait]
impl Tool for EndCallTool {
    fn name(&self) -> &str {
        "end_call"
    }

    fn description(&self) -> &str {
        "End the call once the conversation has concluded"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object(),
        }
    }

    async fn execute(&self, _input: Value) -> Result<ToolOutput, ToolError> {
        self.gate.subscribe().wait().await;

        if !self.terminator.request_end() {
            tracing::debug!("Termination already requested or session gone");
        }

        Ok(ToolOutput::text("The call will now end. Thank you for your time."))
    }
}
