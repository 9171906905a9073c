//! Weather accessor: query weather by date range, with linear
//! interpolation of missing days.

use chrono::NaiveDate;
use flo_core::error::{ModelError, ModelResult};
use flo_core::model::WeatherDay;
use std::collections::BTreeMap;

/// A dense, gap-filled weather series over every calendar date in
/// `[min_date, max_date]` of the days it was built from — including dates
/// entirely absent from the input, which are synthesized rather than
/// skipped. Missing/synthesized `t_max`/`t_min`/`t_mean` values are linearly
/// interpolated between the nearest valid days on each side; leading gaps
/// are held at the first valid value, trailing gaps at the last valid value
/// (so a single valid day fills the whole series with that day's value, per
/// invariant 13).
#[derive(Debug, Clone)]
pub struct WeatherAccessor {
    filled: BTreeMap<NaiveDate, WeatherDay>,
}

impl WeatherAccessor {
    pub fn new(mut days: Vec<WeatherDay>) -> ModelResult<Self> {
        if days.is_empty() {
            return Err(ModelError::InsufficientWeather {
                start: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            });
        }
        days.sort_by_key(|d| d.date);
        days.dedup_by_key(|d| d.date);

        let start = days.first().unwrap().date;
        let end = days.last().unwrap().date;
        let by_date: BTreeMap<NaiveDate, WeatherDay> = days.into_iter().map(|d| (d.date, d)).collect();

        let mut dense_dates = Vec::new();
        let mut cur = start;
        while cur <= end {
            dense_dates.push(cur);
            cur += chrono::Duration::days(1);
        }

        let series_for = |field: fn(&WeatherDay) -> Option<f64>| -> Vec<Option<f64>> {
            dense_dates.iter().map(|date| by_date.get(date).and_then(field)).collect()
        };

        let t_max = interpolate_series(&dense_dates, &series_for(|w| w.t_max)).ok_or(ModelError::InsufficientWeather { start })?;
        let t_min = interpolate_series(&dense_dates, &series_for(|w| w.t_min)).ok_or(ModelError::InsufficientWeather { start })?;
        let t_mean = interpolate_series(&dense_dates, &series_for(|w| w.t_mean)).ok_or(ModelError::InsufficientWeather { start })?;

        let mut filled = BTreeMap::new();
        for (i, date) in dense_dates.into_iter().enumerate() {
            let base = by_date.get(&date).copied().unwrap_or_else(|| WeatherDay::new(date));
            filled.insert(
                date,
                WeatherDay {
                    date,
                    t_max: Some(t_max[i]),
                    t_min: Some(t_min[i]),
                    t_mean: Some(t_mean[i]),
                    ..base
                },
            );
        }
        Ok(Self { filled })
    }

    pub fn get(&self, date: NaiveDate) -> Option<WeatherDay> {
        self.filled.get(&date).copied()
    }

    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<WeatherDay> {
        self.filled.range(start..=end).map(|(_, v)| *v).collect()
    }

    pub fn coverage(&self) -> (NaiveDate, NaiveDate) {
        let first = *self.filled.keys().next().unwrap();
        let last = *self.filled.keys().next_back().unwrap();
        (first, last)
    }
}

/// Linear-interpolate (with hold-first/hold-last at the ends) a sparse
/// series aligned to `dates`. Returns `None` if every value is missing.
fn interpolate_series(dates: &[NaiveDate], values: &[Option<f64>]) -> Option<Vec<f64>> {
    let n = values.len();
    if values.iter().all(|v| v.is_none()) {
        return None;
    }
    let mut out = vec![0.0; n];
    let mut i = 0;
    while i < n {
        if let Some(v) = values[i] {
            out[i] = v;
            i += 1;
            continue;
        }
        // find previous valid (j) and next valid (k)
        let prev = (0..i).rev().find(|&j| values[j].is_some());
        let next = (i..n).find(|&k| values[k].is_some());
        match (prev, next) {
            (Some(j), Some(k)) => {
                let v_prev = values[j].unwrap();
                let v_next = values[k].unwrap();
                let span = (dates[k] - dates[j]).num_days() as f64;
                for m in i..k {
                    let t = (dates[m] - dates[j]).num_days() as f64;
                    let frac = if span > 0.0 { t / span } else { 0.0 };
                    out[m] = v_prev + (v_next - v_prev) * frac;
                }
                i = k;
            }
            (None, Some(k)) => {
                let v_next = values[k].unwrap();
                for item in out.iter_mut().take(k).skip(i) {
                    *item = v_next;
                }
                i = k;
            }
            (Some(j), None) => {
                let v_prev = values[j].unwrap();
                for item in out.iter_mut().take(n).skip(i) {
                    *item = v_prev;
                }
                i = n;
            }
            (None, None) => unreachable!("handled by all-none check above"),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn wd(day: u32, t_mean: Option<f64>) -> WeatherDay {
        WeatherDay {
            t_mean,
            t_max: t_mean,
            t_min: t_mean,
            ..WeatherDay::new(d(day))
        }
    }

    #[test]
    fn single_valid_day_fills_whole_series() {
        let days = vec![wd(1, None), wd(2, Some(20.0)), wd(3, None), wd(4, None)];
        let accessor = WeatherAccessor::new(days).unwrap();
        for day in 1..=4 {
            assert_eq!(accessor.get(d(day)).unwrap().t_mean, Some(20.0));
        }
    }

    #[test]
    fn interpolates_linearly_between_two_valid_days() {
        let days = vec![wd(1, Some(10.0)), wd(2, None), wd(3, Some(20.0))];
        let accessor = WeatherAccessor::new(days).unwrap();
        assert_eq!(accessor.get(d(2)).unwrap().t_mean, Some(15.0));
    }

    #[test]
    fn all_missing_is_insufficient_weather() {
        let days = vec![wd(1, None), wd(2, None)];
        assert!(WeatherAccessor::new(days).is_err());
    }

    #[test]
    fn synthesizes_a_record_for_a_calendar_date_absent_from_the_input() {
        let days = vec![wd(1, Some(10.0)), wd(4, Some(40.0))];
        let accessor = WeatherAccessor::new(days).unwrap();
        assert_eq!(accessor.get(d(2)).unwrap().t_mean, Some(20.0));
        assert_eq!(accessor.get(d(3)).unwrap().t_mean, Some(30.0));
        assert_eq!(accessor.get_range(d(1), d(4)).len(), 4);
    }
}
