use crate::error::{ModelError, ModelResult};
use std::collections::BTreeSet;

/// A crop variety; `groups` carries botanical-family / functional-group tags
/// consumed by [`crate::model::rules::InteractionRule`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Crop {
    pub crop_id: String,
    pub name: String,
    #[serde(default)]
    pub variety: Option<String>,
    pub area_per_unit: f64,
    #[serde(default)]
    pub revenue_per_area: Option<f64>,
    #[serde(default)]
    pub max_revenue: Option<f64>,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Crop {
    pub fn new(crop_id: impl Into<String>, name: impl Into<String>, area_per_unit: f64) -> ModelResult<Self> {
        let crop_id = crop_id.into();
        if area_per_unit <= 0.0 {
            return Err(ModelError::InvalidCrop {
                crop_id,
                reason: "area_per_unit must be positive".to_string(),
            });
        }
        Ok(Self {
            crop_id,
            name: name.into(),
            variety: None,
            area_per_unit,
            revenue_per_area: None,
            max_revenue: None,
            groups: BTreeSet::new(),
        })
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.area_per_unit <= 0.0 {
            return Err(ModelError::InvalidCrop {
                crop_id: self.crop_id.clone(),
                reason: "area_per_unit must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Unique key combining crop id and variety, used wherever a
    /// "(field, crop)" pair needs variety disambiguation.
    pub fn key(&self) -> String {
        match &self.variety {
            Some(v) => format!("{}::{}", self.crop_id, v),
            None => self.crop_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_area_per_unit() {
        assert!(Crop::new("c1", "Rice", 0.0).is_err());
    }
}
