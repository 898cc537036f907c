pub mod journal;

pub use journal::Journal;

use crate::model::{EcosystemStats, Season, SimConfig, Simulation};
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Config file picked up from the working directory when none is named.
pub const DEFAULT_CONFIG_PATH: &str = "terraflora.toml";

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub expand_passes: Option<u32>,
    pub seed: Option<String>,
    pub start_season: Option<Season>,
    pub ticks: Option<u64>,
    pub report_interval: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut SimConfig) {
        if let Some(width) = self.width {
            config.map.width = width;
        }
        if let Some(height) = self.height {
            config.map.height = height;
        }
        if let Some(passes) = self.expand_passes {
            config.map.expand_passes = passes;
        }
        if let Some(seed) = &self.seed {
            config.map.seed = Some(seed.clone());
        }
        if self.start_season.is_some() {
            config.map.start_season = self.start_season;
        }
        if let Some(ticks) = self.ticks {
            config.run.ticks = ticks;
        }
        if let Some(interval) = self.report_interval {
            config.run.report_interval = interval;
        }
    }
}

pub struct App {
    sim: Simulation,
    journal: Option<Rc<RefCell<Journal>>>,
}

impl App {
    /// An explicit path must load. Without one, `terraflora.toml` is used
    /// when present and defaults otherwise.
    pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
        match path {
            Some(path) => Ok(SimConfig::load(path)?),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Ok(SimConfig::load(default_path)?)
                } else {
                    Ok(SimConfig::default())
                }
            }
        }
    }

    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        tracing::info!(fingerprint = %config.fingerprint(), "Configuration loaded");
        Ok(Self {
            sim: Simulation::new(config),
            journal: None,
        })
    }

    /// Journal every event and report from now on to `path`.
    pub fn attach_journal(&mut self, path: &Path) -> Result<()> {
        let journal = Rc::new(RefCell::new(Journal::create(path)?));
        let sink = Rc::clone(&journal);
        self.sim
            .events_mut()
            .subscribe(move |event| sink.borrow_mut().record_event(event));
        self.journal = Some(journal);
        Ok(())
    }

    /// Generate the configured map, step the configured number of ticks and
    /// return the final ecosystem summary.
    pub fn run(&mut self) -> Result<EcosystemStats> {
        let request = self.sim.config().map.clone();
        let run = self.sim.config().run.clone();
        self.sim.generate_map(&request);
        self.report();

        for _ in 0..run.ticks {
            self.sim.step();
            if self.sim.tick() % run.report_interval == 0 {
                self.report();
            }
        }

        let stats = self.sim.stats();
        tracing::info!(
            ticks = stats.tick,
            elapsed_ms = self.sim.metrics().elapsed().as_millis() as u64,
            extinctions = self.sim.metrics().counter("extinctions"),
            transfers = self.sim.metrics().counter("transfers"),
            "Run finished"
        );
        if let Some(journal) = &self.journal {
            journal.borrow_mut().flush()?;
        }
        Ok(stats)
    }

    fn report(&self) {
        let stats = self.sim.stats();
        tracing::info!(
            tick = stats.tick,
            day = stats.day,
            year = stats.year,
            season = %stats.season,
            forcing = stats.forcing_temperature,
            vegetated = stats.vegetated_cells,
            biomass = stats.total_biomass,
            "Ecosystem report"
        );
        if let Some(journal) = &self.journal {
            journal.borrow_mut().record_report(&stats);
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn journal_lines(&self) -> u64 {
        self.journal.as_ref().map_or(0, |j| j.borrow().lines())
    }
}
