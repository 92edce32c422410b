//! Remediation Recommender.
//!
//! Two rule tables sit behind [`RemediationPolicy`]: progress bands over
//! struggling records, and weak-area study plans over a [`ProgressSummary`]
//! of all records.

use serde::Serialize;

use crate::db::models::ProgressRecord;
use crate::repositories::progress::Threshold;
use crate::services::progress_analysis::{analyze, AreaScore, ProgressSummary};

/// Subjects that get a hands-on simulation suggestion for weak areas.
const PRACTICAL_SUBJECTS: &[&str] =
    &["science", "engineering", "mathematics", "physics", "chemistry", "biology"];

const HIGH_PRIORITY_BELOW: f64 = 40.0;
const LOW_COMPLETION_BELOW: f64 = 50.0;

/// Each policy carries exactly what its rule table needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RemediationPolicy<'a> {
    /// Bands by progress percentage over records that are flagged or below `threshold`.
    ThresholdBands { threshold: Threshold },
    /// Study plan over the weak/strong classification of the whole record set.
    WeakAreas { simulation_base_path: &'a str },
}

impl RemediationPolicy<'_> {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::ThresholdBands { .. } => "threshold_bands",
            Self::WeakAreas { .. } => "weak_areas",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recommendations {
    Remediation(Vec<RemediationItem>),
    StudyPlan(StudyPlan),
}

impl Recommendations {
    pub(crate) fn item_count(&self) -> usize {
        match self {
            Self::Remediation(items) => items.len(),
            Self::StudyPlan(plan) => plan.study_recommendations.len() + plan.ar_simulations.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RemediationItem {
    pub(crate) module_name: String,
    pub(crate) current_progress: i32,
    pub(crate) last_score: Option<f64>,
    pub(crate) attempts: i32,
    pub(crate) struggling: bool,
    pub(crate) recommended_action: String,
    pub(crate) resources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Difficulty {
    Beginner,
    Intermediate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StudyRecommendation {
    pub(crate) subject: String,
    pub(crate) topic: String,
    pub(crate) priority: Priority,
    pub(crate) suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SimulationSuggestion {
    pub(crate) subject: String,
    pub(crate) topic: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) simulation_url: String,
    pub(crate) difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StudyPlan {
    pub(crate) analysis: ProgressSummary,
    pub(crate) study_recommendations: Vec<StudyRecommendation>,
    pub(crate) ar_simulations: Vec<SimulationSuggestion>,
    pub(crate) motivational_feedback: String,
}

/// Never fails: empty input yields an empty list or a zero-state plan.
///
/// Band rules filter `records` by their threshold themselves, so callers may
/// pass a pre-filtered or a full record set.
pub(crate) fn recommend(
    policy: RemediationPolicy<'_>,
    records: &[ProgressRecord],
) -> Recommendations {
    match policy {
        RemediationPolicy::ThresholdBands { threshold } => {
            Recommendations::Remediation(remediate(records, threshold))
        }
        RemediationPolicy::WeakAreas { simulation_base_path } => {
            Recommendations::StudyPlan(study_plan(analyze(records), simulation_base_path))
        }
    }
}

fn remediate(records: &[ProgressRecord], threshold: Threshold) -> Vec<RemediationItem> {
    let mut items: Vec<RemediationItem> = records
        .iter()
        .filter(|record| record.needs_remediation(threshold))
        .map(remediation_item)
        .collect();

    items.sort_by(|left, right| {
        left.current_progress
            .cmp(&right.current_progress)
            .then_with(|| right.attempts.cmp(&left.attempts))
            .then_with(|| left.module_name.cmp(&right.module_name))
    });
    items
}

pub(crate) fn remediation_item(record: &ProgressRecord) -> RemediationItem {
    let module_name = record.module_name();
    RemediationItem {
        recommended_action: recommended_action(&module_name, record.progress_percentage),
        resources: resources_for(record),
        module_name,
        current_progress: record.progress_percentage,
        last_score: record.last_score,
        attempts: record.attempts,
        struggling: record.struggling,
    }
}

fn recommended_action(module_name: &str, progress: i32) -> String {
    match progress {
        p if p < 30 => format!(
            "Review fundamentals of {module_name}: revisit the introductory lessons, \
             work through introductory exercises and consider a 1-on-1 tutoring session."
        ),
        p if p < 50 => format!(
            "Strengthen the core topics of {module_name}: complete intermediate exercises, \
             review the video lessons and join a peer study group."
        ),
        p if p < 70 => format!(
            "Work on intermediate concepts in {module_name}: focus targeted practice \
             on the topics you missed."
        ),
        _ => format!("Fine-tune your understanding of {module_name} with targeted practice."),
    }
}

fn resources_for(record: &ProgressRecord) -> Vec<String> {
    let mut resources = Vec::new();

    if record.attempts > 3 {
        resources.push("Schedule a tutoring session with an instructor".to_string());
    }

    if record.last_score.is_some_and(|score| score < 50.0) {
        resources.push("Watch the video tutorials for this module".to_string());
        resources.push("Work through additional practice problems".to_string());
    }

    if record.progress_percentage < 40 {
        resources.push("Start with the beginner-level materials".to_string());
        resources.push("Join a study group for this module".to_string());
    } else if record.progress_percentage < 70 {
        resources.push("Read the supplementary reading materials".to_string());
        resources.push("Apply the concepts in real-world practice exercises".to_string());
    }

    if resources.is_empty() {
        resources.push("Continue regular practice to keep your progress on track".to_string());
    }

    resources
}

fn study_plan(analysis: ProgressSummary, simulation_base_path: &str) -> StudyPlan {
    let mut study_recommendations = Vec::with_capacity(analysis.weak_areas.len());
    let mut ar_simulations = Vec::new();

    for area in &analysis.weak_areas {
        study_recommendations.push(study_recommendation(area));
        if is_practical_subject(&area.subject) {
            ar_simulations.push(simulation_suggestion(area, simulation_base_path));
        }
    }

    let motivational_feedback = motivational_feedback(&analysis);

    StudyPlan { analysis, study_recommendations, ar_simulations, motivational_feedback }
}

fn study_recommendation(area: &AreaScore) -> StudyRecommendation {
    let priority = if area.score < HIGH_PRIORITY_BELOW { Priority::High } else { Priority::Medium };
    StudyRecommendation {
        subject: area.subject.clone(),
        topic: area.topic.clone(),
        priority,
        suggestion: format!(
            "Focus on improving {} in {}. Current score: {}%. \
             Recommended: Review core concepts and practice exercises.",
            area.topic,
            area.subject,
            format_percent(area.score)
        ),
    }
}

fn is_practical_subject(subject: &str) -> bool {
    let subject = subject.trim().to_lowercase();
    PRACTICAL_SUBJECTS.contains(&subject.as_str())
}

fn simulation_suggestion(area: &AreaScore, base_path: &str) -> SimulationSuggestion {
    let difficulty = if area.score < HIGH_PRIORITY_BELOW {
        Difficulty::Beginner
    } else {
        Difficulty::Intermediate
    };
    SimulationSuggestion {
        subject: area.subject.clone(),
        topic: area.topic.clone(),
        title: format!("Interactive {} Simulation", area.topic),
        description: format!("Hands-on AR experience to practice {} concepts", area.topic),
        simulation_url: simulation_url(base_path, &area.subject, &area.topic),
        difficulty,
    }
}

/// `/simulations/biology/cell-structure` for ("Biology", "Cell Structure").
pub(crate) fn simulation_url(base_path: &str, subject: &str, topic: &str) -> String {
    format!("{base_path}/{}/{}", subject.to_lowercase(), topic.to_lowercase().replace(' ', "-"))
}

fn motivational_feedback(analysis: &ProgressSummary) -> String {
    let mut feedback = if analysis.overall_score >= 80.0 {
        "Excellent work! You're performing exceptionally well. Keep up the great effort!"
            .to_string()
    } else if analysis.overall_score >= 60.0 {
        "Good progress! Focus on your weak areas to improve further.".to_string()
    } else {
        "Keep working hard! Consistent practice will help you improve. Don't give up!".to_string()
    };

    if analysis.completion_rate < LOW_COMPLETION_BELOW {
        feedback.push_str(&format!(
            " Try to complete more topics - you're at {}% completion.",
            format_percent(analysis.completion_rate)
        ));
    }

    feedback
}

/// Always shows at least one decimal: `45` -> `45.0`, `66.67` -> `66.67`.
fn format_percent(value: f64) -> String {
    let text = format!("{value:.2}");
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}
