use crate::error::{ModelError, ModelResult};
use std::collections::BTreeSet;

/// A field is the scarce, non-overlappable resource the optimiser allocates.
///
/// Invariant: `area > 0.0` and `daily_fixed_cost >= 0.0`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Field {
    pub field_id: String,
    pub name: String,
    pub area: f64,
    pub daily_fixed_cost: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_fallow_period_days")]
    pub fallow_period_days: i64,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

fn default_fallow_period_days() -> i64 {
    28
}

impl Field {
    pub fn new(field_id: impl Into<String>, name: impl Into<String>, area: f64, daily_fixed_cost: f64) -> ModelResult<Self> {
        let field_id = field_id.into();
        if area <= 0.0 {
            return Err(ModelError::InvalidField {
                field_id,
                reason: "area must be positive".to_string(),
            });
        }
        if daily_fixed_cost < 0.0 {
            return Err(ModelError::InvalidField {
                field_id,
                reason: "daily_fixed_cost must be non-negative".to_string(),
            });
        }
        Ok(Self {
            field_id,
            name: name.into(),
            area,
            daily_fixed_cost,
            location: None,
            fallow_period_days: default_fallow_period_days(),
            groups: BTreeSet::new(),
        })
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.area <= 0.0 {
            return Err(ModelError::InvalidField {
                field_id: self.field_id.clone(),
                reason: "area must be positive".to_string(),
            });
        }
        if self.daily_fixed_cost < 0.0 {
            return Err(ModelError::InvalidField {
                field_id: self.field_id.clone(),
                reason: "daily_fixed_cost must be non-negative".to_string(),
            });
        }
        if self.fallow_period_days < 0 {
            return Err(ModelError::InvalidField {
                field_id: self.field_id.clone(),
                reason: "fallow_period_days must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_area() {
        assert!(Field::new("f1", "Field 1", 0.0, 10.0).is_err());
    }

    #[test]
    fn defaults_fallow_to_28_days() {
        let field = Field::new("f1", "Field 1", 1000.0, 5000.0).unwrap();
        assert_eq!(field.fallow_period_days, 28);
    }
}
