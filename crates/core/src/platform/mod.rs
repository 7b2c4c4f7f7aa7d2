pub mod stub;

use crate::types::{ItemStack, Key, MouseButton, Point, TradeButton};

/// Read-only view of the game client UI. Every call returns a fresh
/// snapshot; the automation never writes through this surface.
///
/// Real implementations (memory reader, plugin host bridge) live in the
/// embedding application. This crate ships only the simulated world in
/// [`stub`].
pub trait GameView: Send + Sync {
    fn in_game(&self) -> bool;
    fn trade_window_visible(&self) -> bool;
    fn trade_slot_item(&self) -> Option<ItemStack>;
    fn trade_button(&self) -> Option<TradeButton>;
    fn inventory_items(&self) -> Vec<ItemStack>;
}

/// Low-level input synthesis and key-state polling. Calls are infallible;
/// a driver that loses its target simply drops the action.
pub trait InputDriver: Send + Sync {
    fn key_down(&self, key: Key);
    fn key_up(&self, key: Key);
    fn is_key_down(&self, key: Key) -> bool;
    fn set_cursor(&self, pos: Point);
    fn click(&self, button: MouseButton);
}
