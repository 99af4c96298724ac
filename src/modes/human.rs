use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval, sleep, Instant};

use super::driver::Driver;
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::render::{Renderer, SceneBuffer};

/// Interactive play in the terminal
pub struct HumanMode {
    driver: Driver,
    scene: SceneBuffer,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let driver = Driver::new(config)?;
        let mut scene = SceneBuffer::new();
        driver.redraw(&mut scene);

        Ok(Self {
            driver,
            scene,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!("interactive game started");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The next tick is re-armed after every tick with the delay it returns
        let next_tick = sleep(self.driver.tick_interval());
        tokio::pin!(next_tick);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => warn!("failed to read terminal event: {err}"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = &mut next_tick, if !self.paused => {
                    let delay = self.driver.tick(&mut self.scene);
                    next_tick.as_mut().reset(Instant::now() + delay);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.driver.metrics_mut().update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.scene, self.driver.metrics(), self.paused);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!("interactive game finished");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    if !self.paused {
                        self.driver.steer_player(direction);
                    }
                }
                KeyAction::TogglePause => {
                    self.paused = !self.paused;
                    if self.paused {
                        self.driver.metrics_mut().pause();
                    } else {
                        self.driver.metrics_mut().resume();
                    }
                }
                KeyAction::Restart => {
                    self.driver.restart(&mut self.scene);
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
