use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::logger;
use crate::platform::{GameView, InputDriver};
use crate::types::{ItemStack, Key, MouseButton, Point, Rect, TradeButton, DIV_CARD_PATH};

/// Fixed geometry of the simulated trade window.
pub const SLOT_RECT: Rect = Rect { l: 390, t: 280, r: 460, b: 350 };
pub const TRADE_BUTTON_RECT: Rect = Rect { l: 360, t: 420, r: 520, b: 460 };

/// Screen rect of inventory cell `index` in the simulated 12x5 grid.
pub fn inventory_rect(index: usize) -> Rect {
    let col = (index % 12) as i32;
    let row = (index / 12) as i32;
    let l = 1288 + col * 53;
    let t = 560 + row * 53;
    Rect { l, t, r: l + 50, b: t + 50 }
}

/// A divination card stack sitting in inventory cell `index`.
pub fn card_stack(index: usize, name: &str, stack_size: u32, max_stack_size: u32) -> ItemStack {
    ItemStack {
        name: name.to_string(),
        path: format!("{}{}", DIV_CARD_PATH, name.replace(' ', "")),
        rect: inventory_rect(index),
        stack_size,
        max_stack_size,
    }
}

/// A non-card item in inventory cell `index` (filler for capacity tests).
pub fn currency_item(index: usize, name: &str) -> ItemStack {
    ItemStack {
        name: name.to_string(),
        path: format!("Metadata/Items/Currency/{}", name.replace(' ', "")),
        rect: inventory_rect(index),
        stack_size: 1,
        max_stack_size: 1,
    }
}

/// One recorded `InputDriver` call, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    SetCursor(Point),
    Click(MouseButton),
}

struct WorldState {
    in_game: bool,
    window_visible: bool,
    button_visible: bool,
    inventory: Vec<ItemStack>,
    slot: Option<ItemStack>,
    grant_reward: bool,
    ignore_moves: bool,
    cursor: Point,
    keys_down: HashSet<Key>,
    events: Vec<InputEvent>,
}

impl WorldState {
    fn ctrl_held(&self) -> bool {
        self.keys_down.contains(&Key::LCtrl)
    }
}

/// Simulated game world behind both facades. Rich enough to drive the whole
/// turn-in loop: ctrl-clicks move stacks between the inventory grid and the
/// trade slot, the trade button consumes the offer and produces a reward.
#[derive(Clone)]
pub struct StubWorld {
    state: Arc<Mutex<WorldState>>,
}

impl StubWorld {
    pub fn new() -> StubWorld {
        logger::register_prefix("stub", logger::COLOR_GRAY);
        StubWorld {
            state: Arc::new(Mutex::new(WorldState {
                in_game: true,
                window_visible: true,
                button_visible: true,
                inventory: Vec::new(),
                slot: None,
                grant_reward: true,
                ignore_moves: false,
                cursor: Point::default(),
                keys_down: HashSet::new(),
                events: Vec::new(),
            })),
        }
    }

    /// A world seeded with a typical mixed inventory.
    pub fn demo() -> StubWorld {
        let world = StubWorld::new();
        world.set_inventory(vec![
            card_stack(0, "Rain of Chaos", 8, 8),
            card_stack(1, "The Doctor", 3, 8),
            card_stack(2, "Destined to Crumble", 5, 5),
            card_stack(3, "Rain of Chaos", 8, 8),
        ]);
        world
    }

    pub fn game(&self) -> Arc<dyn GameView> {
        Arc::new(StubGame { state: Arc::clone(&self.state) })
    }

    pub fn input(&self) -> Arc<dyn InputDriver> {
        Arc::new(StubInput { state: Arc::clone(&self.state) })
    }

    pub fn set_inventory(&self, items: Vec<ItemStack>) {
        self.state.lock().unwrap().inventory = items;
    }

    pub fn set_slot_item(&self, item: ItemStack) {
        let mut state = self.state.lock().unwrap();
        state.slot = Some(ItemStack { rect: SLOT_RECT, ..item });
    }

    pub fn set_in_game(&self, in_game: bool) {
        self.state.lock().unwrap().in_game = in_game;
    }

    pub fn set_window_visible(&self, visible: bool) {
        self.state.lock().unwrap().window_visible = visible;
    }

    pub fn set_trade_button_visible(&self, visible: bool) {
        self.state.lock().unwrap().button_visible = visible;
    }

    /// When false, the trade button consumes the offer without a reward.
    pub fn set_grant_reward(&self, grant: bool) {
        self.state.lock().unwrap().grant_reward = grant;
    }

    /// When true, ctrl-clicks on inventory stacks silently do nothing.
    pub fn set_ignore_moves(&self, ignore: bool) {
        self.state.lock().unwrap().ignore_moves = ignore;
    }

    /// Scripted hotkey press, as seen by `InputDriver::is_key_down`.
    pub fn press_key(&self, key: Key) {
        self.state.lock().unwrap().keys_down.insert(key);
    }

    pub fn release_key(&self, key: Key) {
        self.state.lock().unwrap().keys_down.remove(&key);
    }

    pub fn ctrl_held(&self) -> bool {
        self.state.lock().unwrap().ctrl_held()
    }

    pub fn inventory(&self) -> Vec<ItemStack> {
        self.state.lock().unwrap().inventory.clone()
    }

    pub fn slot_item(&self) -> Option<ItemStack> {
        self.state.lock().unwrap().slot.clone()
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().unwrap().events.clear();
    }
}

impl Default for StubWorld {
    fn default() -> Self {
        StubWorld::new()
    }
}

/// First grid cell whose rect no current item occupies.
fn free_cell(inventory: &[ItemStack]) -> usize {
    (0..60)
        .find(|&i| {
            let rect = inventory_rect(i);
            !inventory.iter().any(|item| item.rect == rect)
        })
        .unwrap_or(inventory.len())
}

fn reward_for(card_name: &str) -> ItemStack {
    let name = match card_name {
        "Rain of Chaos" => "Chaos Orb",
        "The Doctor" => "Headhunter",
        "Destined to Crumble" => "Corrupted Body Armour",
        _ => "Reward Item",
    };
    ItemStack {
        name: name.to_string(),
        path: format!("Metadata/Items/Currency/{}", name.replace(' ', "")),
        rect: SLOT_RECT,
        stack_size: 1,
        max_stack_size: 1,
    }
}

struct StubGame {
    state: Arc<Mutex<WorldState>>,
}

impl GameView for StubGame {
    fn in_game(&self) -> bool {
        self.state.lock().unwrap().in_game
    }

    fn trade_window_visible(&self) -> bool {
        self.state.lock().unwrap().window_visible
    }

    fn trade_slot_item(&self) -> Option<ItemStack> {
        self.state.lock().unwrap().slot.clone()
    }

    fn trade_button(&self) -> Option<TradeButton> {
        let state = self.state.lock().unwrap();
        Some(TradeButton { rect: TRADE_BUTTON_RECT, visible: state.button_visible })
    }

    fn inventory_items(&self) -> Vec<ItemStack> {
        self.state.lock().unwrap().inventory.clone()
    }
}

struct StubInput {
    state: Arc<Mutex<WorldState>>,
}

impl InputDriver for StubInput {
    fn key_down(&self, key: Key) {
        let mut state = self.state.lock().unwrap();
        state.events.push(InputEvent::KeyDown(key));
        state.keys_down.insert(key);
        logger::info_p("stub", &format!("key_down({:?})", key));
    }

    fn key_up(&self, key: Key) {
        let mut state = self.state.lock().unwrap();
        state.events.push(InputEvent::KeyUp(key));
        state.keys_down.remove(&key);
        logger::info_p("stub", &format!("key_up({:?})", key));
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.state.lock().unwrap().keys_down.contains(&key)
    }

    fn set_cursor(&self, pos: Point) {
        let mut state = self.state.lock().unwrap();
        state.events.push(InputEvent::SetCursor(pos));
        state.cursor = pos;
        logger::info_p("stub", &format!("set_cursor({}, {})", pos.x, pos.y));
    }

    fn click(&self, button: MouseButton) {
        let mut state = self.state.lock().unwrap();
        state.events.push(InputEvent::Click(button));
        logger::info_p("stub", &format!("click({:?})", button));

        if button != MouseButton::Left || !state.window_visible {
            return;
        }
        let cursor = state.cursor;

        if state.ctrl_held() {
            // Ctrl-click on an inventory stack offers it into the empty slot.
            if let Some(i) = state.inventory.iter().position(|item| item.rect.contains(cursor)) {
                if state.slot.is_none() && !state.ignore_moves {
                    let mut item = state.inventory.remove(i);
                    item.rect = SLOT_RECT;
                    logger::info_p("stub", &format!("offered {} into trade slot", item.name));
                    state.slot = Some(item);
                }
                return;
            }
            // Ctrl-click on the slot takes its occupant back to the grid.
            if SLOT_RECT.contains(cursor) {
                if let Some(mut item) = state.slot.take() {
                    item.rect = inventory_rect(free_cell(&state.inventory));
                    logger::info_p("stub", &format!("took {} from trade slot", item.name));
                    state.inventory.push(item);
                }
            }
        } else if state.button_visible && TRADE_BUTTON_RECT.contains(cursor) {
            // The trade button consumes the offered stack and, normally,
            // leaves the reward in the slot.
            if let Some(card) = state.slot.take() {
                logger::info_p("stub", &format!("traded {}", card.name));
                if state.grant_reward {
                    state.slot = Some(reward_for(&card.name));
                }
            }
        }
    }
}
