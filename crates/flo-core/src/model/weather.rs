use chrono::NaiveDate;

/// A single day of weather observations. Any field may be missing; callers
/// must interpolate before handing a series to the growth simulator.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub t_max: Option<f64>,
    #[serde(default)]
    pub t_min: Option<f64>,
    #[serde(default)]
    pub t_mean: Option<f64>,
    #[serde(default)]
    pub precipitation_sum: Option<f64>,
    #[serde(default)]
    pub sunshine_duration: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub weather_code: Option<i32>,
}

impl WeatherDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            t_max: None,
            t_min: None,
            t_mean: None,
            precipitation_sum: None,
            sunshine_duration: None,
            wind_speed: None,
            weather_code: None,
        }
    }
}
