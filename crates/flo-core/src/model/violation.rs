/// Kind of rule a [`Violation`] reports. Errors block an allocation; warnings
/// only feed the yield accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    FallowPeriod,
    AreaConstraint,
    TimeOverlap,
    ContinuousCultivation,
    FieldCropIncompatibility,
    HighTempStress,
    LowTempStress,
    FrostRisk,
    SterilityRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A single constraint/stress finding against one allocation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub violation_type: ViolationType,
    pub severity: Severity,
    pub impact_ratio: f64,
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl Violation {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `true` iff no violation in the slice is error-level.
pub fn is_feasible(violations: &[Violation]) -> bool {
    !violations.iter().any(Violation::is_error)
}

/// Composes daily stress impacts multiplicatively into a yield factor in
/// `[0, 1]`: `yield_factor = Π_d Π_k (1 − daily_impact_k(d))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldImpactAccumulator {
    factor: f64,
}

impl Default for YieldImpactAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldImpactAccumulator {
    pub fn new() -> Self {
        Self { factor: 1.0 }
    }

    /// Apply one day's impact ratio (a fraction in `[0, 1]` representing the
    /// loss, e.g. `0.05` for a 5% daily impact).
    pub fn apply_daily_impact(&mut self, impact_ratio: f64) {
        let retained = (1.0 - impact_ratio).clamp(0.0, 1.0);
        self.factor *= retained;
    }

    pub fn yield_factor(&self) -> f64 {
        self.factor.clamp(0.0, 1.0)
    }

    pub fn get_yield_loss_percentage(&self) -> f64 {
        (1.0 - self.yield_factor()) * 100.0
    }
}
