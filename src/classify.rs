use crate::cli::ScoreDirection;
use crate::model::{ClassifiedMatch, SimilarityPair};

const SELF_MATCH_SCORE: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct DetectionConfig {
    pub threshold: f64,
    pub direction: ScoreDirection,
    pub self_match_epsilon: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            direction: ScoreDirection::AtOrAbove,
            self_match_epsilon: f64::EPSILON,
        }
    }
}

impl DetectionConfig {
    pub fn is_self_match(&self, score: f64) -> bool {
        (score - SELF_MATCH_SCORE).abs() <= self.self_match_epsilon
    }

    pub fn crosses_threshold(&self, score: f64) -> bool {
        match self.direction {
            ScoreDirection::AtOrAbove => score >= self.threshold,
            ScoreDirection::AtOrBelow => score <= self.threshold,
        }
    }
}

pub fn classify(pairs: &[SimilarityPair], config: &DetectionConfig) -> Vec<ClassifiedMatch> {
    pairs
        .iter()
        .map(|pair| {
            let is_self_match = config.is_self_match(pair.score());
            ClassifiedMatch {
                candidate: pair.candidate().to_string(),
                score: pair.score(),
                is_self_match,
                is_suspicious: !is_self_match && config.crosses_threshold(pair.score()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(candidate: &str, score: f64) -> SimilarityPair {
        SimilarityPair(candidate.to_string(), score)
    }

    #[test]
    fn identity_score_is_a_self_match_and_never_suspicious() {
        let pairs = vec![pair("requests", 1.0)];

        let matches = classify(&pairs, &DetectionConfig::default());

        assert_eq!(matches.len(), 1);
        assert!(matches[0].is_self_match);
        assert!(!matches[0].is_suspicious);
    }

    #[test]
    fn score_at_threshold_is_suspicious() {
        let pairs = vec![pair("requestz", 0.85)];

        let matches = classify(&pairs, &DetectionConfig::default());

        assert!(!matches[0].is_self_match);
        assert!(matches[0].is_suspicious);
    }

    #[test]
    fn score_below_threshold_is_benign() {
        let pairs = vec![pair("unrelated", 0.4)];

        let matches = classify(&pairs, &DetectionConfig::default());

        assert!(!matches[0].is_self_match);
        assert!(!matches[0].is_suspicious);
    }

    #[test]
    fn at_or_below_direction_flags_small_scores() {
        let config = DetectionConfig {
            threshold: 3.0,
            direction: ScoreDirection::AtOrBelow,
            self_match_epsilon: f64::EPSILON,
        };
        let pairs = vec![
            pair("close-name", 2.0),
            pair("far-name", 7.0),
        ];

        let matches = classify(&pairs, &config);

        assert!(matches[0].is_suspicious);
        assert!(!matches[1].is_suspicious);
    }

    #[test]
    fn distance_variant_with_at_or_above_reproduces_observed_behavior() {
        let config = DetectionConfig {
            threshold: 3.0,
            direction: ScoreDirection::AtOrAbove,
            self_match_epsilon: f64::EPSILON,
        };
        let pairs = vec![
            pair("self", 1.0),
            pair("flagged", 3.5),
            pair("quiet", 2.5),
        ];

        let matches = classify(&pairs, &config);

        assert!(matches[0].is_self_match);
        assert!(matches[1].is_suspicious);
        assert!(!matches[2].is_suspicious);
    }

    #[test]
    fn wider_epsilon_absorbs_near_identity_scores() {
        let config = DetectionConfig {
            self_match_epsilon: 0.01,
            ..DetectionConfig::default()
        };
        let pairs = vec![
            pair("rounded-self", 0.995),
            pair("near-miss", 0.97),
        ];

        let matches = classify(&pairs, &config);

        assert!(matches[0].is_self_match);
        assert!(!matches[1].is_self_match);
        assert!(matches[1].is_suspicious);
    }
}
