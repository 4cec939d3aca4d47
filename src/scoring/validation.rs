use super::config::ScoringConfig;

/// Allowed drift of the weight sum from 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Weights
    let weights = &config.weights;
    let named = [
        ("commute", weights.commute),
        ("flood", weights.flood),
        ("pollution", weights.pollution),
        ("density", weights.density),
        ("green", weights.green),
    ];
    let mut weights_ok = true;
    for (name, weight) in named {
        if !weight.is_finite() || weight < 0.0 {
            errors.push(format!(
                "scoring.weights.{}: must be a non-negative number, got {}",
                name, weight
            ));
            weights_ok = false;
        }
    }
    if weights_ok && (weights.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!(
            "scoring.weights: must sum to 1.0, got {}",
            weights.sum()
        ));
    }

    // Commute
    let commute = &config.commute;
    check_finite(&mut errors, "scoring.commute.missing_minutes", commute.missing_minutes);
    if !commute.free_minutes.is_finite() || commute.free_minutes < 0.0 {
        errors.push("scoring.commute.free_minutes: must be non-negative".to_string());
    }
    if !commute.points_per_minute.is_finite() || commute.points_per_minute <= 0.0 {
        errors.push("scoring.commute.points_per_minute: must be positive".to_string());
    }

    check_bounds(
        &mut errors,
        "scoring.flood",
        ("best_zone", config.flood.best_zone),
        ("worst_zone", config.flood.worst_zone),
    );
    check_bounds(
        &mut errors,
        "scoring.pollution",
        ("aod_min", config.pollution.aod_min),
        ("aod_max", config.pollution.aod_max),
    );
    check_bounds(
        &mut errors,
        "scoring.green",
        ("ndvi_min", config.green.ndvi_min),
        ("ndvi_max", config.green.ndvi_max),
    );

    let max_density = config.density.max_density;
    if !max_density.is_finite() || max_density <= 0.0 {
        errors.push("scoring.density.max_density: must be positive".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_finite(errors: &mut Vec<String>, path: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("{}: must be a finite number, got {}", path, value));
    }
}

/// Both bounds finite and strictly ordered
fn check_bounds(errors: &mut Vec<String>, section: &str, low: (&str, f64), high: (&str, f64)) {
    let before = errors.len();
    check_finite(errors, &format!("{}.{}", section, low.0), low.1);
    check_finite(errors, &format!("{}.{}", section, high.0), high.1);
    if errors.len() == before && low.1 >= high.1 {
        errors.push(format!(
            "{}: {} ({}) must be below {} ({})",
            section, low.0, low.1, high.0, high.1
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{DensityScale, PollutionScale, Weights};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_reweighted_config_is_valid() {
        let config = ScoringConfig {
            weights: Weights {
                commute: 0.4,
                flood: 0.1,
                pollution: 0.1,
                density: 0.1,
                green: 0.3,
            },
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = ScoringConfig {
            weights: Weights {
                commute: 0.5,
                ..Weights::default()
            },
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.weights: must sum to 1.0"));
    }

    #[test]
    fn test_negative_weight() {
        let config = ScoringConfig {
            weights: Weights {
                commute: -0.25,
                ..Weights::default()
            },
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        // Sum check is skipped once an individual weight is bad
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.weights.commute"));
    }

    #[test]
    fn test_inverted_pollution_bounds() {
        let config = ScoringConfig {
            pollution: PollutionScale {
                aod_min: 0.6,
                aod_max: 0.02,
            },
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.pollution: aod_min"));
    }

    #[test]
    fn test_zero_max_density() {
        let config = ScoringConfig {
            density: DensityScale { max_density: 0.0 },
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.density.max_density"));
    }

    #[test]
    fn test_non_finite_bound() {
        let mut config = ScoringConfig::default();
        config.green.ndvi_max = f64::NAN;
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.green.ndvi_max"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::default();
        config.weights.flood = 0.9; // Error 1
        config.commute.points_per_minute = 0.0; // Error 2
        config.flood.best_zone = 3.0; // Error 3
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
