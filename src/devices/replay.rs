// src/devices/replay.rs
// Replays a scripted sequence of samples, one per call. Used by the
// simulation binary and the controller tests in place of a live camera.

use log::info;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;

use crate::Result;
use crate::core::Measurement;
use crate::navigation::{MeasurementSource, NavigationError};

/// Scripted measurement source.
///
/// Once the script is exhausted every sample is absent, unless looping is
/// enabled.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    script: Vec<Option<Measurement>>,
    pending: VecDeque<Option<Measurement>>,
    looping: bool,
}

// Scenario file: a list of samples, `~` for "no target".
#[derive(Deserialize)]
struct ReplayFile {
    samples: Vec<Option<Measurement>>,
}

impl ReplaySource {
    /// Creates a source that plays `script` once.
    pub fn new(script: Vec<Option<Measurement>>) -> Self {
        ReplaySource {
            pending: script.iter().copied().collect(),
            script,
            looping: false,
        }
    }

    /// Restarts the script whenever it runs out.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Loads a scenario file.
    ///
    /// ```yaml
    /// samples:
    ///   - ~
    ///   - { distance: 1500.0, angle: 45.0 }
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let replay: ReplayFile = serde_yaml::from_reader(file)?;
        info!("Loaded {} samples from {}", replay.samples.len(), path.display());
        Ok(ReplaySource::new(replay.samples))
    }

    /// Samples left before the script ends (or restarts).
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl MeasurementSource for ReplaySource {
    fn sample(&mut self) -> std::result::Result<Option<Measurement>, NavigationError> {
        if self.pending.is_empty() && self.looping {
            self.pending.extend(self.script.iter().copied());
        }
        Ok(self.pending.pop_front().flatten())
    }
}
