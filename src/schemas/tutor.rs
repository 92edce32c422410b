use serde::{Deserialize, Serialize};

use crate::services::progress_analysis::ProgressSummary;
use crate::services::remediation::{
    Recommendations, RemediationItem, SimulationSuggestion, StudyPlan, StudyRecommendation,
};

pub(crate) const COMPACT_STUDY_LIMIT: usize = 5;
pub(crate) const COMPACT_SIMULATION_LIMIT: usize = 3;

#[derive(Debug, Serialize)]
pub(crate) struct ListEnvelope<T> {
    pub(crate) data: Vec<T>,
    pub(crate) count: usize,
}

impl<T> From<Vec<T>> for ListEnvelope<T> {
    fn from(data: Vec<T>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThresholdQuery {
    #[serde(default)]
    pub(crate) threshold: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudyPlanQuery {
    #[serde(default)]
    pub(crate) compact: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudyPlanResponse {
    pub(crate) analysis: ProgressSummary,
    pub(crate) study_recommendations: Vec<StudyRecommendation>,
    pub(crate) ar_simulations: Vec<SimulationSuggestion>,
    pub(crate) motivational_feedback: String,
}

impl StudyPlanResponse {
    /// `compact` caps the lists for small widgets; the analysis is never trimmed.
    pub(crate) fn from_plan(plan: StudyPlan, compact: bool) -> Self {
        let StudyPlan {
            analysis,
            mut study_recommendations,
            mut ar_simulations,
            motivational_feedback,
        } = plan;
        if compact {
            study_recommendations.truncate(COMPACT_STUDY_LIMIT);
            ar_simulations.truncate(COMPACT_SIMULATION_LIMIT);
        }
        Self { analysis, study_recommendations, ar_simulations, motivational_feedback }
    }
}

/// Band policies answer with a list envelope, the weak-area policy with a plan.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum RecommendationsResponse {
    Remediation(ListEnvelope<RemediationItem>),
    StudyPlan(StudyPlanResponse),
}

impl RecommendationsResponse {
    pub(crate) fn from_recommendations(recommendations: Recommendations, compact: bool) -> Self {
        match recommendations {
            Recommendations::Remediation(items) => Self::Remediation(items.into()),
            Recommendations::StudyPlan(plan) => {
                Self::StudyPlan(StudyPlanResponse::from_plan(plan, compact))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::progress::Threshold;
    use crate::services::remediation::{recommend, RemediationPolicy};
    use crate::test_support::progress_record;

    const WEAK_AREAS: RemediationPolicy<'static> =
        RemediationPolicy::WeakAreas { simulation_base_path: "/simulations" };

    fn weak_records(topics: usize) -> Vec<crate::db::models::ProgressRecord> {
        (0..topics)
            .map(|i| {
                progress_record("Physics", &format!("Topic {i}"), |r| r.last_score = Some(20.0))
            })
            .collect()
    }

    fn weak_plan(topics: usize) -> StudyPlan {
        match recommend(WEAK_AREAS, &weak_records(topics)) {
            Recommendations::StudyPlan(plan) => plan,
            other => panic!("expected study plan, got {other:?}"),
        }
    }

    #[test]
    fn envelope_counts_items() {
        let envelope = ListEnvelope::from(vec!["a", "b"]);
        let body = serde_json::to_value(&envelope).expect("json");
        assert_eq!(body, serde_json::json!({ "data": ["a", "b"], "count": 2 }));
    }

    #[test]
    fn compact_plan_truncates_lists_only() {
        let response = StudyPlanResponse::from_plan(weak_plan(8), true);

        assert_eq!(response.study_recommendations.len(), COMPACT_STUDY_LIMIT);
        assert_eq!(response.ar_simulations.len(), COMPACT_SIMULATION_LIMIT);
        assert_eq!(response.analysis.weak_areas.len(), 8);
    }

    #[test]
    fn full_plan_keeps_everything() {
        let response = StudyPlanResponse::from_plan(weak_plan(8), false);

        assert_eq!(response.study_recommendations.len(), 8);
        assert_eq!(response.ar_simulations.len(), 8);
    }

    #[test]
    fn plan_serializes_with_stable_keys() {
        let body = serde_json::to_value(StudyPlanResponse::from_plan(weak_plan(1), false))
            .expect("json");

        assert_eq!(body["analysis"]["total_topics"], 1);
        assert_eq!(body["study_recommendations"][0]["priority"], "high");
        assert_eq!(body["ar_simulations"][0]["difficulty"], "beginner");
        assert_eq!(body["ar_simulations"][0]["simulation_url"], "/simulations/physics/topic-0");
        assert!(body["motivational_feedback"].is_string());
    }

    #[test]
    fn response_shape_follows_policy() {
        let records = weak_records(8);

        let threshold = Threshold::new(60).expect("threshold");
        let bands = recommend(RemediationPolicy::ThresholdBands { threshold }, &records);
        let body = serde_json::to_value(RecommendationsResponse::from_recommendations(bands, true))
            .expect("json");
        assert_eq!(body["count"], 8);
        assert_eq!(body["data"].as_array().expect("data").len(), 8);

        let plan = recommend(WEAK_AREAS, &records);
        let body = serde_json::to_value(RecommendationsResponse::from_recommendations(plan, true))
            .expect("json");
        assert_eq!(body["study_recommendations"].as_array().expect("study").len(), 5);
        assert!(body.get("count").is_none());
    }
}
