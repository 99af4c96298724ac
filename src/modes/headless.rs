//! Headless simulation mode
//!
//! Runs the same driver loop as interactive play, but into an in-memory scene
//! and without a terminal. Useful for soak-testing the rules and for watching
//! the rival's behaviour through the log file.

use anyhow::Result;
use log::info;

use super::driver::{Clock, Driver, NoWait, RunSummary, ThreadClock};
use crate::game::GameConfig;
use crate::render::SceneBuffer;

pub struct HeadlessMode {
    driver: Driver,
    scene: SceneBuffer,
    ticks: u64,
    realtime: bool,
}

impl HeadlessMode {
    /// `ticks` ticks will be simulated; with `realtime` the loop sleeps the
    /// configured delays between them
    pub fn new(config: GameConfig, ticks: u64, realtime: bool) -> Result<Self> {
        Ok(Self {
            driver: Driver::new(config)?,
            scene: SceneBuffer::new(),
            ticks,
            realtime,
        })
    }

    pub fn run(&mut self) -> RunSummary {
        info!(
            "headless run of {} ticks ({})",
            self.ticks,
            if self.realtime { "real time" } else { "no wait" }
        );

        let mut clock: Box<dyn Clock> = if self.realtime {
            Box::new(ThreadClock)
        } else {
            Box::new(NoWait)
        };
        let summary = self
            .driver
            .run(&mut self.scene, clock.as_mut(), Some(self.ticks));

        info!("headless run finished: {:?}", summary);
        summary
    }

    pub fn scene(&self) -> &SceneBuffer {
        &self.scene
    }
}

/// One-line report of a finished run
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "ticks: {} | rounds lost: {} | apples: {} | rival respawns: {} | best score: {}",
        summary.ticks,
        summary.rounds_finished,
        summary.apples_eaten,
        summary.rival_respawns,
        summary.high_score
    )
}
