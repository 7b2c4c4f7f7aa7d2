use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::task::TaskConfig;
use crate::types::{Key, Point};

/// Persisted user settings. Numeric fields are clamped to their UI ranges
/// on load, so a hand-edited file cannot push the sequencer outside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enabled: bool,
    pub turn_in_key: Key,
    pub stop_key: Key,
    /// Delay between sequencer actions, ms (20-500).
    pub delay_between_actions: u64,
    /// Pause after each completed turn-in cycle, ms (100-2000).
    pub pause_between_cycles: u64,
    /// Comma-separated card names to turn in; empty means every card.
    pub card_names: String,
    /// Pixel offset applied to the trade-button click target (-100..100).
    pub trade_button_offset_x: i32,
    pub trade_button_offset_y: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            turn_in_key: Key::F5,
            stop_key: Key::F6,
            delay_between_actions: 100,
            pause_between_cycles: 500,
            card_names: String::new(),
            trade_button_offset_x: 0,
            trade_button_offset_y: 0,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        let mut settings: Settings = std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        settings.clamp_ranges();
        settings
    }

    pub fn save(&self, path: &Path) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(path, json);
        }
    }

    pub fn clamp_ranges(&mut self) {
        self.delay_between_actions = self.delay_between_actions.clamp(20, 500);
        self.pause_between_cycles = self.pause_between_cycles.clamp(100, 2000);
        self.trade_button_offset_x = self.trade_button_offset_x.clamp(-100, 100);
        self.trade_button_offset_y = self.trade_button_offset_y.clamp(-100, 100);
    }

    /// Parse the allow-list: split on commas, trim, drop empties.
    pub fn card_allow_list(&self) -> Vec<String> {
        self.card_names
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Immutable per-run snapshot handed to a spawned turn-in worker.
    pub fn task_config(&self) -> TaskConfig {
        TaskConfig {
            delay_between_actions: self.delay_between_actions,
            pause_between_cycles: self.pause_between_cycles,
            allow_list: self.card_allow_list(),
            trade_button_offset: Point {
                x: self.trade_button_offset_x,
                y: self.trade_button_offset_y,
            },
        }
    }
}
