//! The simulation clock: owns the map, the species registry and the random
//! source, and drives generation and per-tick stepping.

use crate::calendar::{Calendar, CalendarDate};
use crate::config::SimConfig;
use crate::events::{EventBus, SimEvent};
use crate::map::Map;
use crate::metrics::Metrics;
use crate::rng::SeededRng;
use crate::species::{SpeciesRegistry, SpeciesStepReport};
use crate::terrain::TerrainSynthesizer;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Instant;
use terraflora_data::{Season, Species};

/// Upper bound on expand passes; each pass quadruples the cell count.
pub const MAX_EXPAND_PASSES: u32 = 10;

/// Arguments of one map generation.
///
/// `width` and `height` size the seed grid; the generated map is
/// `width * 2^expand_passes` by `height * 2^expand_passes`. Negative sizes
/// produce an empty map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MapRequest {
    pub width: i32,
    pub height: i32,
    pub expand_passes: u32,
    #[serde(deserialize_with = "de_seed")]
    pub seed: Option<String>,
    #[serde(deserialize_with = "de_season")]
    pub start_season: Option<Season>,
}

impl Default for MapRequest {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            expand_passes: 3,
            seed: None,
            start_season: None,
        }
    }
}

impl MapRequest {
    #[must_use]
    pub fn new(width: i32, height: i32, expand_passes: u32, seed: Option<&str>) -> Self {
        Self {
            width,
            height,
            expand_passes,
            seed: seed.map(str::to_owned),
            start_season: None,
        }
    }

    #[must_use]
    pub fn with_start_season(mut self, season: Season) -> Self {
        self.start_season = Some(season);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn de_seed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SeedValue>::deserialize(deserializer)?.map(|seed| match seed {
        SeedValue::Text(s) => s,
        SeedValue::Integer(n) => n.to_string(),
        SeedValue::Float(f) => f.to_string(),
    }))
}

fn de_season<'de, D>(deserializer: D) -> Result<Option<Season>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(name) => Season::parse(&name)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown season `{name}`"))),
    }
}

/// Ecosystem summary at the current tick.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EcosystemStats {
    pub tick: u64,
    pub day: u64,
    pub year: u64,
    pub season: Season,
    pub forcing_temperature: f64,
    pub width: usize,
    pub height: usize,
    pub land_cells: usize,
    /// Land cells whose vegetation value is above zero.
    pub vegetated_cells: usize,
    pub total_biomass: f64,
    pub mean_land_temperature: f64,
    pub extinctions: usize,
    pub transfers: usize,
}

pub struct Simulation {
    config: SimConfig,
    calendar: Calendar,
    date: CalendarDate,
    start_season: Option<Season>,
    tick: u64,
    map: Map,
    species: SpeciesRegistry,
    rng: SeededRng,
    events: EventBus,
    last_report: SpeciesStepReport,
    metrics: Metrics,
}

impl Simulation {
    /// An empty 0x0 world at tick 0.
    ///
    /// The config is taken as given; call [`SimConfig::validate`] first to
    /// reject out-of-range values. Zero calendar lengths are raised to one.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let calendar = Calendar::new(config.calendar.clone());
        let date = calendar.date_at(0);
        let metrics = Metrics::new(config.run.report_interval);
        Self {
            config,
            calendar,
            date,
            start_season: None,
            tick: 0,
            map: Map::empty(),
            species: SpeciesRegistry::default(),
            rng: SeededRng::from_seed_str(None),
            events: EventBus::new(),
            last_report: SpeciesStepReport::default(),
            metrics,
        }
    }

    /// Season that day one of the next generated map falls in. A request
    /// that names its own start season overrides this.
    pub fn set_start_season(&mut self, season: Option<Season>) {
        self.start_season = season;
    }

    /// Replace the map and registry with freshly generated ones and reset
    /// the clock.
    pub fn generate_map(&mut self, request: &MapRequest) {
        let width = request.width.max(0) as usize;
        let height = request.height.max(0) as usize;
        if request.width < 0 || request.height < 0 {
            tracing::warn!(
                width = request.width,
                height = request.height,
                "Negative map size, generating an empty map"
            );
        }
        let passes = if request.expand_passes > MAX_EXPAND_PASSES {
            tracing::warn!(
                requested = request.expand_passes,
                max = MAX_EXPAND_PASSES,
                "Clamping expand passes"
            );
            MAX_EXPAND_PASSES
        } else {
            request.expand_passes
        };

        if request.start_season.is_some() {
            self.start_season = request.start_season;
        }
        self.calendar.set_start_season(self.start_season);

        let previous = self.date;
        self.tick = 0;
        self.date = self.calendar.date_at(0);

        let mut rng = SeededRng::from_seed_str(request.seed.as_deref());
        let fields = TerrainSynthesizer::generate(width, height, passes, &mut rng);
        let map = fields.into_map(self.date.forcing_temperature);
        let species = SpeciesRegistry::build(&map, &self.config.vegetation, &mut rng);

        tracing::info!(
            seed = rng.seed_label(),
            reproducible = rng.is_reproducible(),
            width = map.width(),
            height = map.height(),
            land = map.land_count(),
            vegetation = species.count_of(Species::Vegetation),
            "Map generated"
        );

        self.map = map;
        self.species = species;
        self.rng = rng;
        self.last_report = SpeciesStepReport::default();
        self.metrics.record_generation(self.map.len());

        self.events.publish(&SimEvent::MapGenerated { map: &self.map });
        self.publish_calendar_changes(&previous);
    }

    /// Advance one tick: clock, notifications, cell temperatures, species.
    pub fn step(&mut self) {
        let started = Instant::now();
        self.tick += 1;
        let previous = self.date;
        self.date = self.calendar.date_at(self.tick);
        self.publish_calendar_changes(&previous);

        let changed = self.map.step(self.date.forcing_temperature);
        self.last_report = self
            .species
            .step(&self.map, &mut self.rng, &self.config.vegetation);

        self.metrics
            .add_to_counter("extinctions", self.last_report.extinctions as u64);
        self.metrics
            .add_to_counter("transfers", self.last_report.transfers as u64);
        self.metrics.record_tick(started.elapsed(), changed);
    }

    fn publish_calendar_changes(&self, previous: &CalendarDate) {
        let date = &self.date;
        if date.day != previous.day || date.year != previous.year {
            self.events.publish(&SimEvent::DayChanged {
                day: date.day,
                year: date.year,
            });
        }
        if date.season != previous.season {
            tracing::debug!(season = %date.season, year = date.year, "Season changed");
            self.events
                .publish(&SimEvent::SeasonChanged { season: date.season });
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn day(&self) -> u64 {
        self.date.day
    }

    pub fn year(&self) -> u64 {
        self.date.year
    }

    pub fn season(&self) -> Season {
        self.date.season
    }

    pub fn season_progress(&self) -> f64 {
        self.date.season_progress
    }

    pub fn year_progress(&self) -> f64 {
        self.date.year_progress
    }

    pub fn forcing_temperature(&self) -> f64 {
        self.date.forcing_temperature
    }

    pub fn date(&self) -> &CalendarDate {
        &self.date
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn species(&self) -> &SpeciesRegistry {
        &self.species
    }

    /// Direct access for scenario setup, such as clearing a cell's vegetation.
    pub fn species_mut(&mut self) -> &mut SpeciesRegistry {
        &mut self.species
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed_label(&self) -> &str {
        self.rng.seed_label()
    }

    pub fn last_step_report(&self) -> SpeciesStepReport {
        self.last_report
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn stats(&self) -> EcosystemStats {
        let mut land_cells = 0;
        let mut land_temperature = 0.0;
        for cell in self.map.cells().iter().filter(|c| !c.is_water()) {
            land_cells += 1;
            land_temperature += cell.temperature();
        }

        let mut vegetated_cells = 0;
        let mut total_biomass = 0.0;
        for (_, veg) in self.species.vegetation().iter() {
            if veg.is_alive() {
                vegetated_cells += 1;
                total_biomass += veg.value();
            }
        }

        EcosystemStats {
            tick: self.tick,
            day: self.date.day,
            year: self.date.year,
            season: self.date.season,
            forcing_temperature: self.date.forcing_temperature,
            width: self.map.width(),
            height: self.map.height(),
            land_cells,
            vegetated_cells,
            total_biomass,
            mean_land_temperature: if land_cells > 0 {
                land_temperature / land_cells as f64
            } else {
                0.0
            },
            extinctions: self.last_report.extinctions,
            transfers: self.last_report.transfers,
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
