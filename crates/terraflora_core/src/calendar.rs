//! Tick to calendar mapping and the seasonal forcing temperature.

use serde::{Deserialize, Serialize};
use terraflora_data::Season;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CalendarConfig {
    pub ticks_per_day: u64,
    pub days_per_year: u64,
    /// Base temperature (°C) of Spring, Summer, Fall, Winter.
    pub season_temperatures: [f64; 4],
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 900,
            days_per_year: 20,
            season_temperatures: [12.0, 26.0, 14.0, -2.0],
        }
    }
}

impl CalendarConfig {
    #[must_use]
    pub fn days_per_season(&self) -> f64 {
        self.days_per_year as f64 / Season::ALL.len() as f64
    }

    #[must_use]
    pub fn ticks_per_year(&self) -> u64 {
        self.ticks_per_day * self.days_per_year
    }

    #[must_use]
    pub fn base_temperature(&self, season: Season) -> f64 {
        self.season_temperatures[season.index()]
    }
}

/// Everything derived from one tick count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    /// 1-based day of the year.
    pub day: u64,
    /// 1-based year.
    pub year: u64,
    pub season: Season,
    pub season_progress: f64,
    pub year_progress: f64,
    pub forcing_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Calendar {
    config: CalendarConfig,
    offset_days: f64,
}

impl Calendar {
    /// Zero `ticks_per_day` or `days_per_year` is raised to one.
    #[must_use]
    pub fn new(mut config: CalendarConfig) -> Self {
        if config.ticks_per_day == 0 || config.days_per_year == 0 {
            tracing::warn!(
                ticks_per_day = config.ticks_per_day,
                days_per_year = config.days_per_year,
                "Degenerate calendar, raising zero lengths to one"
            );
            config.ticks_per_day = config.ticks_per_day.max(1);
            config.days_per_year = config.days_per_year.max(1);
        }
        Self {
            config,
            offset_days: 0.0,
        }
    }

    /// Phase-shift the year so tick 0 falls on the first day of `start`.
    /// `None` starts in Spring.
    pub fn set_start_season(&mut self, start: Option<Season>) {
        let index = start.map_or(0, |s| s.index());
        self.offset_days = index as f64 * self.config.days_per_season();
    }

    pub fn offset_days(&self) -> f64 {
        self.offset_days
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    #[must_use]
    pub fn date_at(&self, tick: u64) -> CalendarDate {
        let days_per_year = self.config.days_per_year as f64;
        let days = tick as f64 / self.config.ticks_per_day as f64 + self.offset_days;
        let whole_days = days.floor() as u64;

        let year_progress = (days % days_per_year) / days_per_year;
        let season_float = year_progress * Season::ALL.len() as f64;
        let season_index = (season_float.floor() as usize).min(Season::ALL.len() - 1);
        let season_progress = season_float - season_index as f64;

        let season = Season::from_index(season_index);
        let from = self.config.base_temperature(season);
        let to = self.config.base_temperature(season.next());

        CalendarDate {
            day: whole_days % self.config.days_per_year + 1,
            year: whole_days / self.config.days_per_year + 1,
            season,
            season_progress,
            year_progress,
            forcing_temperature: from + (to - from) * season_progress,
        }
    }
}
