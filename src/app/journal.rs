//! JSON-lines journal of simulation events and periodic reports.

use crate::model::{Biome, EcosystemStats, SimEvent};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Entry<'a> {
    MapGenerated {
        width: usize,
        height: usize,
        land_cells: usize,
        biomes: BTreeMap<Biome, usize>,
    },
    DayChanged {
        day: u64,
        year: u64,
    },
    SeasonChanged {
        season: crate::model::Season,
    },
    Report(&'a EcosystemStats),
}

#[derive(Serialize)]
struct Line<'a> {
    at: String,
    #[serde(flatten)]
    entry: Entry<'a>,
}

pub struct Journal {
    writer: BufWriter<File>,
    lines: u64,
    failed: bool,
}

impl Journal {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("creating journal {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            lines: 0,
            failed: false,
        })
    }

    pub fn record_event(&mut self, event: &SimEvent<'_>) {
        let entry = match event {
            SimEvent::MapGenerated { map } => Entry::MapGenerated {
                width: map.width(),
                height: map.height(),
                land_cells: map.land_count(),
                biomes: map.biome_counts(),
            },
            SimEvent::DayChanged { day, year } => Entry::DayChanged {
                day: *day,
                year: *year,
            },
            SimEvent::SeasonChanged { season } => Entry::SeasonChanged { season: *season },
        };
        self.write(entry);
    }

    pub fn record_report(&mut self, stats: &EcosystemStats) {
        self.write(Entry::Report(stats));
    }

    /// Lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("flushing journal")
    }

    // Event handlers cannot return errors: the first failure is logged and
    // the journal goes quiet.
    fn write(&mut self, entry: Entry<'_>) {
        if self.failed {
            return;
        }
        let line = Line {
            at: Utc::now().to_rfc3339(),
            entry,
        };
        let result = serde_json::to_writer(&mut self.writer, &line)
            .map_err(anyhow::Error::from)
            .and_then(|()| self.writer.write_all(b"\n").map_err(anyhow::Error::from));
        match result {
            Ok(()) => self.lines += 1,
            Err(e) => {
                tracing::warn!("Journal write failed, disabling journal: {e}");
                self.failed = true;
            }
        }
    }
}
