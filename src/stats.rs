//! Aggregate statistics over the record collection
//!
//! Pure functions, recomputed on every read. Nothing is cached.

use serde::Serialize;

use crate::config::{Config, Language};
use crate::consts::*;
use crate::record::Record;

/// Qualitative grade band, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Band {
    Deficient,
    NeedsImprovement,
    Good,
    Outstanding,
}

impl Band {
    /// Band for a grade, using inclusive lower bounds
    pub fn of(grade: f64) -> Self {
        if grade >= OUTSTANDING_FROM {
            Band::Outstanding
        } else if grade >= GOOD_FROM {
            Band::Good
        } else if grade >= NEEDS_IMPROVEMENT_FROM {
            Band::NeedsImprovement
        } else {
            Band::Deficient
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Outstanding => "outstanding",
            Band::Good => "good",
            Band::NeedsImprovement => "needs improvement",
            Band::Deficient => "deficient",
        }
    }

    /// Display label in the configured language
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.as_str(),
            Language::Spanish => match self {
                Band::Outstanding => "Destacado",
                Band::Good => "Bueno",
                Band::NeedsImprovement => "Debe mejorar",
                Band::Deficient => "Deficiente",
            },
        }
    }
}

/// Statistics for one snapshot of the collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub count: usize,
    /// `None` when there are no records
    pub mean: Option<f64>,
    /// Grades below the pass threshold
    pub must_improve: usize,
    /// Grades at or above the pass threshold
    pub passing: usize,
    /// Band of each record, in collection order
    pub bands: Vec<Band>,
}

impl Statistics {
    pub fn compute(records: &[Record], config: &Config) -> Self {
        let count = records.len();
        let mean = mean(records);
        let passing = records
            .iter()
            .filter(|r| r.grade >= config.pass_threshold)
            .count();

        Self {
            count,
            mean,
            must_improve: count - passing,
            passing,
            bands: records.iter().map(|r| Band::of(r.grade)).collect(),
        }
    }

    /// Per-record band labels in the configured language
    pub fn band_labels(&self, language: Language) -> Vec<&'static str> {
        self.bands.iter().map(|b| b.label(language)).collect()
    }
}

/// Arithmetic mean of all grades, `None` for an empty collection
pub fn mean(records: &[Record]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(|r| r.grade).sum();
    Some(sum / records.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    fn records(grades: &[f64]) -> Vec<Record> {
        grades
            .iter()
            .map(|&grade| Record {
                name: "Ana".into(),
                last_name: None,
                subject: "Math".into(),
                grade,
            })
            .collect()
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Band::of(7.0), Band::Outstanding);
        assert_eq!(Band::of(6.5), Band::Outstanding);
        assert_eq!(Band::of(6.49), Band::Good);
        assert_eq!(Band::of(5.6), Band::Good);
        assert_eq!(Band::of(5.59), Band::NeedsImprovement);
        assert_eq!(Band::of(4.0), Band::NeedsImprovement);
        assert_eq!(Band::of(3.9), Band::Deficient);
        assert_eq!(Band::of(1.0), Band::Deficient);

        assert_eq!(Band::of(6.5).as_str(), "outstanding");
        assert_eq!(Band::of(4.0).as_str(), "needs improvement");
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(Band::Good.label(Language::English), "good");
        assert_eq!(Band::NeedsImprovement.label(Language::Spanish), "Debe mejorar");
    }

    #[test]
    fn test_empty_collection() {
        let stats = Statistics::compute(&[], &Config::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.must_improve, 0);
        assert_eq!(stats.passing, 0);
        assert!(stats.bands.is_empty());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&records(&[4.0, 6.0])), Some(5.0));
        assert_eq!(mean(&records(&[7.0])), Some(7.0));
    }

    #[test]
    fn test_pass_threshold_per_profile() {
        let recs = records(&[3.0, 4.0, 4.9, 5.0, 6.8]);

        let standard = Statistics::compute(&recs, &Config::from_profile(Profile::Standard));
        assert_eq!(standard.count, 5);
        assert_eq!(standard.must_improve, 3);
        assert_eq!(standard.passing, 2);

        let extended = Statistics::compute(&recs, &Config::from_profile(Profile::Extended));
        assert_eq!(extended.must_improve, 1);
        assert_eq!(extended.passing, 4);

        assert_eq!(
            standard.bands,
            vec![
                Band::Deficient,
                Band::NeedsImprovement,
                Band::NeedsImprovement,
                Band::NeedsImprovement,
                Band::Outstanding
            ]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let stats = Statistics::compute(&[], &Config::default());
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"count":0,"mean":null,"mustImprove":0,"passing":0,"bands":[]}"#);
    }
}
