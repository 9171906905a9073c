use crate::error::{ModelError, ModelResult};

/// Per-growth-stage temperature thresholds and their daily impact ratios.
///
/// Each `*_daily_impact` is a fraction in `[0, 1]` consumed multiplicatively
/// by [`crate::model::violation::YieldImpactAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemperatureProfile {
    pub base_temperature: f64,
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub low_stress_threshold: f64,
    pub high_stress_threshold: f64,
    pub frost_threshold: f64,
    #[serde(default)]
    pub sterility_risk_threshold: Option<f64>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
    pub high_temp_daily_impact: f64,
    pub low_temp_daily_impact: f64,
    pub frost_daily_impact: f64,
    #[serde(default)]
    pub sterility_daily_impact: f64,
}

impl TemperatureProfile {
    pub fn is_high_temp_stress(&self, t_max: f64) -> bool {
        t_max >= self.high_stress_threshold
    }

    pub fn is_low_temp_stress(&self, t_mean: f64) -> bool {
        t_mean <= self.low_stress_threshold
    }

    pub fn is_frost_risk(&self, t_min: f64) -> bool {
        t_min <= self.frost_threshold
    }

    pub fn is_sterility_risk(&self, t_max: f64) -> bool {
        match self.sterility_risk_threshold {
            Some(threshold) => t_max >= threshold,
            None => false,
        }
    }
}

/// Minimum / target daylight hours for a growth stage.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SunshineProfile {
    pub minimum_sunshine_hours: f64,
    pub target_sunshine_hours: f64,
}

/// Thermal (GDD) requirement for a stage or for a whole crop.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThermalRequirement {
    pub required_gdd: f64,
    #[serde(default)]
    pub harvest_start_gdd: Option<f64>,
}

impl ThermalRequirement {
    pub fn new(required_gdd: f64, harvest_start_gdd: Option<f64>) -> ModelResult<Self> {
        if required_gdd <= 0.0 {
            return Err(ModelError::InvalidProfile {
                crop_id: String::new(),
                reason: "required_gdd must be positive".to_string(),
            });
        }
        if let Some(h) = harvest_start_gdd {
            if h > required_gdd {
                return Err(ModelError::InvalidProfile {
                    crop_id: String::new(),
                    reason: "harvest_start_gdd must be <= required_gdd".to_string(),
                });
            }
        }
        Ok(Self { required_gdd, harvest_start_gdd })
    }

    pub fn is_met(&self, accumulated_gdd: f64) -> bool {
        accumulated_gdd >= self.required_gdd
    }

    pub fn is_harvest_started(&self, accumulated_gdd: f64) -> bool {
        match self.harvest_start_gdd {
            Some(h) => accumulated_gdd >= h,
            None => self.is_met(accumulated_gdd),
        }
    }
}

/// One ordered phase of a crop's life cycle. `order` starts at 1 and is
/// strictly increasing across a [`CropProfile`]'s stages.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrowthStage {
    pub name: String,
    pub order: u32,
}

/// Bundles one stage's thermal/temperature/sunshine requirements.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageRequirement {
    pub stage: GrowthStage,
    pub temperature: TemperatureProfile,
    pub sunshine: SunshineProfile,
    pub thermal: ThermalRequirement,
}

/// A crop's full, ordered stage-wise growth profile.
///
/// Invariant: stage orders are `1, 2, 3, ...` strictly increasing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropProfile {
    pub crop_id: String,
    #[serde(default)]
    pub variety: Option<String>,
    pub stages: Vec<StageRequirement>,
}

impl CropProfile {
    pub fn validate(&self) -> ModelResult<()> {
        if self.stages.is_empty() {
            return Err(ModelError::InvalidProfile {
                crop_id: self.crop_id.clone(),
                reason: "profile must declare at least one stage".to_string(),
            });
        }
        for (i, stage_req) in self.stages.iter().enumerate() {
            let expected = (i + 1) as u32;
            if stage_req.stage.order != expected {
                return Err(ModelError::InvalidProfile {
                    crop_id: self.crop_id.clone(),
                    reason: format!(
                        "stage orders must be 1..N strictly increasing; expected {expected} at position {i}, found {}",
                        stage_req.stage.order
                    ),
                });
            }
        }
        Ok(())
    }

    /// Sum of each stage's `required_gdd` — the crop's total thermal time.
    pub fn total_required_gdd(&self) -> f64 {
        self.stages.iter().map(|s| s.thermal.required_gdd).sum()
    }

    pub fn base_temperature(&self) -> f64 {
        self.stages
            .first()
            .map(|s| s.temperature.base_temperature)
            .unwrap_or(0.0)
    }

    /// The stage active at a given accumulated-GDD level: the first stage
    /// whose cumulative required GDD (from stage 1) exceeds the accumulator.
    pub fn stage_at(&self, accumulated_gdd: f64) -> Option<&StageRequirement> {
        let mut cumulative = 0.0;
        for stage_req in &self.stages {
            cumulative += stage_req.thermal.required_gdd;
            if accumulated_gdd < cumulative {
                return Some(stage_req);
            }
        }
        self.stages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(order: u32, required_gdd: f64) -> StageRequirement {
        StageRequirement {
            stage: GrowthStage { name: format!("stage{order}"), order },
            temperature: TemperatureProfile {
                base_temperature: 10.0,
                optimal_min: 20.0,
                optimal_max: 28.0,
                low_stress_threshold: 12.0,
                high_stress_threshold: 35.0,
                frost_threshold: 0.0,
                sterility_risk_threshold: Some(38.0),
                max_temperature: None,
                high_temp_daily_impact: 0.05,
                low_temp_daily_impact: 0.05,
                frost_daily_impact: 0.5,
                sterility_daily_impact: 0.2,
            },
            sunshine: SunshineProfile { minimum_sunshine_hours: 4.0, target_sunshine_hours: 8.0 },
            thermal: ThermalRequirement::new(required_gdd, None).unwrap(),
        }
    }

    #[test]
    fn total_required_gdd_sums_stages() {
        let profile = CropProfile { crop_id: "rice".into(), variety: None, stages: vec![stage(1, 300.0), stage(2, 400.0)] };
        assert!(profile.validate().is_ok());
        assert_eq!(profile.total_required_gdd(), 700.0);
    }

    #[test]
    fn rejects_non_increasing_orders() {
        let profile = CropProfile { crop_id: "rice".into(), variety: None, stages: vec![stage(1, 300.0), stage(1, 400.0)] };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn stage_at_finds_correct_stage() {
        let profile = CropProfile { crop_id: "rice".into(), variety: None, stages: vec![stage(1, 300.0), stage(2, 400.0)] };
        assert_eq!(profile.stage_at(100.0).unwrap().stage.order, 1);
        assert_eq!(profile.stage_at(350.0).unwrap().stage.order, 2);
        assert_eq!(profile.stage_at(10_000.0).unwrap().stage.order, 2);
    }
}
