use crate::types::{Key, MouseButton, Point};

/// Key held during item clicks so the client routes the item through the
/// trade window instead of a plain inventory pickup.
pub const MODIFIER: Key = Key::LCtrl;

/// Fixed settle time around modifier press/release.
pub const TAP_DELAY_MS: u64 = 20;

/// One atomic step of a pointer gesture. `Wait` steps are suspension points;
/// everything else maps to exactly one `InputDriver` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    KeyDown(Key),
    KeyUp(Key),
    SetCursor(Point),
    Click(MouseButton),
    Wait(u64),
}

/// Build the timed step sequence for a single click on `target`.
///
/// With the modifier: press, short settle, move, delay, click, short settle,
/// release, delay. Without it only the move, delay and click remain.
pub fn sequence(target: Point, use_modifier: bool, delay_ms: u64) -> Vec<Step> {
    let mut steps = Vec::new();
    if use_modifier {
        steps.push(Step::KeyDown(MODIFIER));
        steps.push(Step::Wait(TAP_DELAY_MS));
    }
    steps.push(Step::SetCursor(target));
    steps.push(Step::Wait(delay_ms));
    steps.push(Step::Click(MouseButton::Left));
    if use_modifier {
        steps.push(Step::Wait(TAP_DELAY_MS));
        steps.push(Step::KeyUp(MODIFIER));
        steps.push(Step::Wait(delay_ms));
    }
    steps
}
