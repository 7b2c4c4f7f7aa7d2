use std::sync::Arc;

use crate::logger;
use crate::platform::{GameView, InputDriver};
use crate::settings::Settings;
use crate::task::{TaskHandle, PREFIX};

/// Per-tick supervisor. Owns the only [`TaskHandle`] and the previous hotkey
/// states used for edge detection; the worker shares nothing else with it.
pub struct SessionController {
    game: Arc<dyn GameView>,
    input: Arc<dyn InputDriver>,
    task: Option<TaskHandle>,
    start_was_down: bool,
    stop_was_down: bool,
}

impl SessionController {
    pub fn new(game: Arc<dyn GameView>, input: Arc<dyn InputDriver>) -> SessionController {
        logger::register_prefix(PREFIX, logger::COLOR_BLUE);
        SessionController { game, input, task: None, start_was_down: false, stop_was_down: false }
    }

    /// Whether a turn-in worker is currently running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_done())
    }

    /// Run one supervisor tick: sample hotkey edges, police the trade-window
    /// precondition, start or cancel the worker.
    pub fn tick(&mut self, settings: &Settings) {
        let start_down = self.input.is_key_down(settings.turn_in_key);
        let stop_down = self.input.is_key_down(settings.stop_key);
        let start_pressed = start_down && !self.start_was_down;
        let stop_pressed = stop_down && !self.stop_was_down;
        self.start_was_down = start_down;
        self.stop_was_down = stop_down;

        if !settings.enabled || !self.game.in_game() {
            return;
        }

        // Reap a finished worker so a new press can start fresh.
        if self.task.as_ref().is_some_and(|t| t.is_done()) {
            self.task = None;
        }

        if !self.game.trade_window_visible() {
            if let Some(mut task) = self.task.take() {
                logger::info_p(PREFIX, "Trade window closed, stopping the turn-in process.");
                task.cancel();
            }
            return;
        }

        if start_pressed && self.task.is_none() {
            self.task = Some(TaskHandle::spawn(
                Arc::clone(&self.game),
                Arc::clone(&self.input),
                settings.task_config(),
            ));
        }

        if stop_pressed {
            if let Some(mut task) = self.task.take() {
                logger::info_p(PREFIX, "Manual stop requested. Halting the turn-in process.");
                task.cancel();
            }
        }
    }
}
