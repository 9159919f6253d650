//! Wire models shared by the screening and chat clients.

use serde::{Deserialize, Serialize};

/// Structured candidate profile extracted from a resume by the remote
/// screening service. Immutable once received; `skills` keeps the server's
/// relevance ordering and must not be reordered client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub years_of_experience: Option<u32>,
}

/// Hiring recommendation from the decision agent. Parsed case-insensitively;
/// anything outside these three values is a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Recommendation {
    Hire,
    Interview,
    Reject,
}

impl TryFrom<String> for Recommendation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "hire" => Ok(Recommendation::Hire),
            "interview" => Ok(Recommendation::Interview),
            "reject" => Ok(Recommendation::Reject),
            other => Err(format!("unknown recommendation '{other}'")),
        }
    }
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Hire => "hire",
            Recommendation::Interview => "interview",
            Recommendation::Reject => "reject",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision agent output for one screening call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutput {
    /// Confidence score, 0-100.
    pub confidence_score: f64,
    pub recommendation: Recommendation,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    /// Skills match percentage, 0-100.
    pub skill_match_percentage: f64,
    pub experience_match: String,
    pub summary: String,
}

impl DecisionOutput {
    /// Clamps both scores to [0, 100]. The remote model occasionally
    /// returns out-of-range values; display code relies on the bound.
    pub(crate) fn clamp_scores(&mut self) {
        self.confidence_score = self.confidence_score.clamp(0.0, 100.0);
        self.skill_match_percentage = self.skill_match_percentage.clamp(0.0, 100.0);
    }
}

/// Aggregate result of one screening call. Created atomically per request,
/// never mutated; replaced wholesale on the next submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResponse {
    pub candidate_profile: CandidateProfile,
    pub decision: DecisionOutput,
    pub status: String,
}

/// Job description payload for the `/screen-json` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobData {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_required: Option<u32>,
}

/// Liveness probe result from `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a chat transcript. `content` is append-only while an
/// assistant message is still streaming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Splits a comma-separated skills string into trimmed, non-empty entries.
pub fn parse_skills(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins a skills list back into the comma-separated form the screening
/// API expects.
pub fn format_skills(skills: &[String]) -> String {
    skills.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_parses_case_insensitively() {
        for raw in ["hire", "Hire", "HIRE"] {
            let rec: Recommendation = serde_json::from_str(&format!("\"{raw}\"")).unwrap();
            assert_eq!(rec, Recommendation::Hire);
        }
        let rec: Recommendation = serde_json::from_str("\"Interview\"").unwrap();
        assert_eq!(rec, Recommendation::Interview);
    }

    #[test]
    fn test_recommendation_rejects_unknown_value() {
        let result = serde_json::from_str::<Recommendation>("\"maybe\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_recommendation_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Recommendation::Reject).unwrap(),
            "\"reject\""
        );
    }

    #[test]
    fn test_candidate_profile_defaults_missing_certifications() {
        let json = r#"{
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": null,
            "summary": "Engineer",
            "skills": ["Rust", "SQL"],
            "experience": ["5 years systems work"],
            "education": ["BSc Mathematics"],
            "years_of_experience": 5
        }"#;
        let profile: CandidateProfile = serde_json::from_str(json).unwrap();
        assert!(profile.certifications.is_empty());
        assert_eq!(profile.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_clamp_scores_bounds_out_of_range_values() {
        let mut decision = DecisionOutput {
            confidence_score: 142.0,
            recommendation: Recommendation::Hire,
            advantages: vec![],
            disadvantages: vec![],
            skill_match_percentage: -3.5,
            experience_match: "exceeds".to_string(),
            summary: String::new(),
        };
        decision.clamp_scores();
        assert_eq!(decision.confidence_score, 100.0);
        assert_eq!(decision.skill_match_percentage, 0.0);
    }

    #[test]
    fn test_job_data_omits_absent_optional_fields() {
        let job = JobData {
            title: "Backend Engineer".to_string(),
            description: "Build services".to_string(),
            required_skills: vec!["Rust".to_string()],
            preferred_skills: None,
            experience_required: None,
        };
        let json = serde_json::to_string(&job).unwrap();
        assert!(!json.contains("preferred_skills"));
        assert!(!json.contains("experience_required"));
    }

    #[test]
    fn test_chat_message_role_serializes_lowercase() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }

    #[test]
    fn test_parse_skills_trims_and_drops_empties() {
        assert_eq!(
            parse_skills(" Rust, , Tokio ,SQL,"),
            vec!["Rust", "Tokio", "SQL"]
        );
        assert!(parse_skills("  ,  ").is_empty());
    }

    #[test]
    fn test_format_skills_joins_with_comma_space() {
        let skills = vec!["Rust".to_string(), "Tokio".to_string()];
        assert_eq!(format_skills(&skills), "Rust, Tokio");
    }
}
