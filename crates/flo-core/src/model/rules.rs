/// The kind of crop-interaction effect a rule encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionRuleType {
    ContinuousCultivation,
    BeneficialRotation,
    SoilCompatibility,
    ClimateCompatibility,
    CompanionPlanting,
}

/// A data-driven yield multiplier keyed by (source-group, target-group).
///
/// `impact_ratio`: 1.0 = neutral, < 1.0 = penalty, > 1.0 = bonus.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InteractionRule {
    pub rule_id: String,
    pub rule_type: InteractionRuleType,
    pub source_group: String,
    pub target_group: String,
    pub impact_ratio: f64,
    pub is_directional: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl InteractionRule {
    /// Whether this rule applies to an ordered pair `(a_groups, b_groups)`,
    /// where `a` is the earlier / source side and `b` the later / target
    /// side. Non-directional rules also match the reversed pairing.
    pub fn matches(&self, a_groups: &[String], b_groups: &[String]) -> bool {
        let forward = a_groups.iter().any(|g| g == &self.source_group)
            && b_groups.iter().any(|g| g == &self.target_group);
        if forward {
            return true;
        }
        if !self.is_directional {
            return a_groups.iter().any(|g| g == &self.target_group)
                && b_groups.iter().any(|g| g == &self.source_group);
        }
        false
    }

    pub fn get_impact(&self, a_groups: &[String], b_groups: &[String]) -> f64 {
        if self.matches(a_groups, b_groups) {
            self.impact_ratio
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(directional: bool) -> InteractionRule {
        InteractionRule {
            rule_id: "r1".into(),
            rule_type: InteractionRuleType::ContinuousCultivation,
            source_group: "Solanaceae".into(),
            target_group: "Solanaceae".into(),
            impact_ratio: 0.8,
            is_directional: directional,
            description: None,
        }
    }

    #[test]
    fn directional_rule_does_not_match_reverse_when_groups_differ() {
        let r = InteractionRule {
            source_group: "A".into(),
            target_group: "B".into(),
            ..rule(true)
        };
        assert!(r.matches(&["A".into()], &["B".into()]));
        assert!(!r.matches(&["B".into()], &["A".into()]));
    }

    #[test]
    fn non_directional_rule_matches_either_order() {
        let r = InteractionRule {
            source_group: "A".into(),
            target_group: "B".into(),
            ..rule(false)
        };
        assert!(r.matches(&["A".into()], &["B".into()]));
        assert!(r.matches(&["B".into()], &["A".into()]));
    }

    #[test]
    fn get_impact_is_neutral_when_unmatched() {
        let r = rule(true);
        assert_eq!(r.get_impact(&["Other".into()], &["Other".into()]), 1.0);
    }
}
