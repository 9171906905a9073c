//! Shared fixtures for flo-algo's integration test suite.

use chrono::NaiveDate;
use flo_algo::WeatherAccessor;
use flo_core::model::{Crop, CropProfile, Field, GrowthStage, StageRequirement, SunshineProfile, TemperatureProfile, ThermalRequirement, WeatherDay};

pub fn temp_profile(base: f64) -> TemperatureProfile {
    TemperatureProfile {
        base_temperature: base,
        optimal_min: base + 10.0,
        optimal_max: base + 18.0,
        low_stress_threshold: base + 2.0,
        high_stress_threshold: base + 25.0,
        frost_threshold: 0.0,
        sterility_risk_threshold: Some(base + 28.0),
        max_temperature: None,
        high_temp_daily_impact: 0.05,
        low_temp_daily_impact: 0.05,
        frost_daily_impact: 0.5,
        sterility_daily_impact: 0.2,
    }
}

pub fn rice_profile() -> CropProfile {
    let stage = |name: &str, order: u32, gdd: f64| StageRequirement {
        stage: GrowthStage { name: name.to_string(), order },
        temperature: temp_profile(10.0),
        sunshine: SunshineProfile { minimum_sunshine_hours: 4.0, target_sunshine_hours: 8.0 },
        thermal: ThermalRequirement::new(gdd, None).unwrap(),
    };
    CropProfile {
        crop_id: "rice".to_string(),
        variety: None,
        stages: vec![stage("seedling", 1, 500.0), stage("vegetative", 2, 1000.0), stage("flowering", 3, 500.0)],
    }
}

pub fn weather_series(year: i32, month: u32, day: u32, count: i64, t_mean: f64) -> WeatherAccessor {
    let start = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    let mut days = Vec::new();
    for i in 0..count {
        let date = start + chrono::Duration::days(i);
        days.push(WeatherDay {
            t_max: Some(t_mean + 5.0),
            t_min: Some(t_mean - 5.0),
            t_mean: Some(t_mean),
            ..WeatherDay::new(date)
        });
    }
    WeatherAccessor::new(days).unwrap()
}

pub fn field(id: &str, area: f64, daily_cost: f64) -> Field {
    Field::new(id, id, area, daily_cost).unwrap()
}

pub fn crop(id: &str, revenue_per_area: f64) -> Crop {
    let mut c = Crop::new(id, id, 1.0).unwrap();
    c.revenue_per_area = Some(revenue_per_area);
    c
}
