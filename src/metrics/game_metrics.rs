use std::time::{Duration, Instant};

/// Session statistics shown next to the board.
///
/// The round clock only runs while the game is unpaused.
pub struct GameMetrics {
    round_started: Instant,
    paused_since: Option<Instant>,
    paused_total: Duration,
    round_time: Duration,
    pub high_score: u32,
    /// Rounds that ended with the player dying
    pub games_played: u32,
    pub rival_respawns: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            paused_since: None,
            paused_total: Duration::ZERO,
            round_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            rival_respawns: 0,
        }
    }

    /// Play time of the current round as of the last [`update`](Self::update)
    pub fn round_time(&self) -> Duration {
        self.round_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        let current_pause = self
            .paused_since
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
        let paused = self.paused_total + current_pause;
        self.round_time = now
            .saturating_duration_since(self.round_started)
            .saturating_sub(paused);
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    fn pause_at(&mut self, now: Instant) {
        if self.paused_since.is_none() {
            self.update_at(now);
            self.paused_since = Some(now);
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    fn resume_at(&mut self, now: Instant) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total += now.saturating_duration_since(since);
        }
    }

    /// Restart the round clock. A pause in progress carries over into the new round.
    pub fn on_game_start(&mut self) {
        self.start_round_at(Instant::now());
    }

    fn start_round_at(&mut self, now: Instant) {
        self.round_started = now;
        self.paused_total = Duration::ZERO;
        self.round_time = Duration::ZERO;
        if self.paused_since.is_some() {
            self.paused_since = Some(now);
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
    }

    pub fn on_rival_respawn(&mut self) {
        self.rival_respawns += 1;
    }

    /// Round time as `mm:ss`
    pub fn format_time(&self) -> String {
        let secs = self.round_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        assert_eq!(metrics.format_time(), "00:00");

        metrics.round_time = secs(125);
        assert_eq!(metrics.format_time(), "02:05");
    }

    #[test]
    fn test_paused_time_not_counted() {
        let mut metrics = GameMetrics::new();
        let t0 = Instant::now();
        metrics.start_round_at(t0);

        metrics.update_at(t0 + secs(10));
        assert_eq!(metrics.round_time(), secs(10));

        metrics.pause_at(t0 + secs(10));
        assert!(metrics.is_paused());
        metrics.update_at(t0 + secs(70));
        assert_eq!(metrics.round_time(), secs(10));

        metrics.resume_at(t0 + secs(70));
        assert!(!metrics.is_paused());
        metrics.update_at(t0 + secs(75));
        assert_eq!(metrics.round_time(), secs(15));
        assert_eq!(metrics.format_time(), "00:15");
    }

    #[test]
    fn test_repeated_pause_and_resume() {
        let mut metrics = GameMetrics::new();
        let t0 = Instant::now();
        metrics.start_round_at(t0);

        metrics.pause_at(t0 + secs(1));
        // A second pause keeps the first start point
        metrics.pause_at(t0 + secs(3));
        metrics.resume_at(t0 + secs(5));
        // Resuming while running does nothing
        metrics.resume_at(t0 + secs(6));
        metrics.update_at(t0 + secs(8));

        assert_eq!(metrics.round_time(), secs(4));
    }

    #[test]
    fn test_new_round_clears_paused_time() {
        let mut metrics = GameMetrics::new();
        let t0 = Instant::now();
        metrics.start_round_at(t0);
        metrics.pause_at(t0 + secs(2));
        metrics.resume_at(t0 + secs(30));

        metrics.start_round_at(t0 + secs(40));
        metrics.update_at(t0 + secs(45));
        assert_eq!(metrics.round_time(), secs(5));
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(3);
        assert_eq!(metrics.high_score, 3);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(1);
        assert_eq!(metrics.high_score, 3);
        assert_eq!(metrics.games_played, 2);
    }

    #[test]
    fn test_rival_respawn_count() {
        let mut metrics = GameMetrics::new();
        metrics.on_rival_respawn();
        metrics.on_rival_respawn();
        assert_eq!(metrics.rival_respawns, 2);
    }
}
