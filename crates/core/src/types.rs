use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Screen coordinate pair (pixels, window client space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn offset(self, dx: i32, dy: i32) -> Point {
        Point { x: self.x + dx, y: self.y + dy }
    }
}

/// Screen-coordinate bounding box of a UI element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub l: i32,
    pub t: i32,
    pub r: i32,
    pub b: i32,
}

impl Rect {
    pub fn new(l: i32, t: i32, r: i32, b: i32) -> Rect {
        Rect { l, t, r, b }
    }

    pub fn center(&self) -> Point {
        Point { x: (self.l + self.r) / 2, y: (self.t + self.b) / 2 }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.l && p.x <= self.r && p.y >= self.t && p.y <= self.b
    }
}

/// Metadata path prefix shared by every divination card item.
pub const DIV_CARD_PATH: &str = "Metadata/Items/DivinationCards/";

/// One inventory or trade-slot item, snapshotted per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub name: String,
    pub path: String,
    pub rect: Rect,
    pub stack_size: u32,
    pub max_stack_size: u32,
}

impl ItemStack {
    pub fn is_divination_card(&self) -> bool {
        self.path.starts_with(DIV_CARD_PATH)
    }

    /// Only complete sets are worth turning in; partial stacks never qualify.
    pub fn is_full_stack(&self) -> bool {
        self.stack_size == self.max_stack_size
    }
}

/// Snapshot of the trade-confirm control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeButton {
    pub rect: Rect,
    pub visible: bool,
}

/// Keys the settings can bind and the sequencer can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    LCtrl,
    LShift,
    LAlt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Cooperative cancellation flag shared between the supervisor and the worker.
/// Observed only at suspension points, never mid-click.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Returned by a timed wait that was interrupted by its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;
