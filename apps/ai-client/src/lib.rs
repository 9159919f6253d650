//! AI-assisted evaluation client for the job portal.
//!
//! Two network-facing protocol clients live here: the resume screening
//! pipeline (multipart upload, structured decision payload) and the
//! streaming career-chat client (event-stream assembly into an
//! append-only transcript). Routing, rendering, and the hosted data
//! backend are external collaborators.

pub mod chat;
pub mod config;
pub mod errors;
pub mod models;
pub mod screening;

pub use chat::{ChatClient, ChatSession, TurnState};
pub use config::Config;
pub use errors::ApiError;
pub use models::{
    format_skills, parse_skills, CandidateProfile, ChatMessage, DecisionOutput, HealthStatus,
    JobData, Recommendation, Role, ScreeningResponse,
};
pub use screening::validation::{is_valid_resume_file, ResumeFile};
pub use screening::ScreeningClient;
