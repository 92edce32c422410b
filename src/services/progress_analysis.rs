//! Progress Aggregator: reduces a student's records into dashboard/recommendation input.

use serde::Serialize;

use crate::db::models::ProgressRecord;

pub(crate) const WEAK_SCORE_BELOW: f64 = 60.0;
pub(crate) const STRONG_SCORE_FROM: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct AreaScore {
    pub(crate) subject: String,
    pub(crate) topic: String,
    pub(crate) score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ProgressSummary {
    pub(crate) weak_areas: Vec<AreaScore>,
    pub(crate) strong_areas: Vec<AreaScore>,
    pub(crate) overall_score: f64,
    pub(crate) completion_rate: f64,
    pub(crate) total_topics: usize,
}

impl ProgressSummary {
    pub(crate) fn empty() -> Self {
        Self {
            weak_areas: Vec::new(),
            strong_areas: Vec::new(),
            overall_score: 0.0,
            completion_rate: 0.0,
            total_topics: 0,
        }
    }
}

/// Records without a score count toward `total_topics` and `completion_rate`
/// but are left out of the mean and of both area lists. Scores in `[60, 80)`
/// stay unclassified.
pub(crate) fn analyze(records: &[ProgressRecord]) -> ProgressSummary {
    if records.is_empty() {
        return ProgressSummary::empty();
    }

    let mut weak_areas = Vec::new();
    let mut strong_areas = Vec::new();
    let mut score_sum = 0.0;
    let mut scored = 0usize;
    let mut completed = 0usize;

    for record in records {
        if record.completed {
            completed += 1;
        }

        let Some(score) = record.last_score else {
            continue;
        };
        score_sum += score;
        scored += 1;

        let area = || AreaScore {
            subject: record.subject.clone(),
            topic: record.topic.clone(),
            score,
        };
        if score < WEAK_SCORE_BELOW {
            weak_areas.push(area());
        } else if score >= STRONG_SCORE_FROM {
            strong_areas.push(area());
        }
    }

    let overall_score = if scored == 0 { 0.0 } else { round2(score_sum / scored as f64) };
    let completion_rate = round2(completed as f64 / records.len() as f64 * 100.0);

    ProgressSummary {
        weak_areas,
        strong_areas,
        overall_score,
        completion_rate,
        total_topics: records.len(),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
