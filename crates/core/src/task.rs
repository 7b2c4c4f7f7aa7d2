use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::click::{self, Step};
use crate::logger;
use crate::platform::{GameView, InputDriver};
use crate::sleep;
use crate::types::{CancelToken, Cancelled, ItemStack, MouseButton, Point};

/// Log prefix for the turn-in worker.
pub const PREFIX: &str = "trader";

/// Player inventory slot count; a full inventory cannot receive rewards.
pub const INVENTORY_CAPACITY: usize = 60;

/// Extra settle time after the trade-button click while the trade resolves
/// server-side.
const TRADE_SETTLE_MS: u64 = 150;

/// Immutable per-run configuration, snapshotted from the settings when the
/// worker is spawned.
#[derive(Debug, Clone, Default)]
pub struct TaskConfig {
    pub delay_between_actions: u64,
    pub pause_between_cycles: u64,
    pub allow_list: Vec<String>,
    pub trade_button_offset: Point,
}

/// Why a turn-in run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No eligible full stacks remain.
    NoFullStacks,
    /// Inventory at capacity; rewards would have nowhere to land.
    InventoryFull,
    /// The trade slot already held something. Never auto-cleared.
    SlotOccupied,
    /// The card did not arrive in the trade slot after the move click.
    MoveFailed,
    /// The trade-confirm button was absent or hidden.
    TradeButtonMissing,
    /// The supervisor cancelled the run mid-sequence.
    Cancelled,
}

/// Select the first inventory entry, in display order, that is a divination
/// card, a full stack, and (when an allow-list is configured) named in it.
pub fn next_full_stack<'a>(items: &'a [ItemStack], allow_list: &[String]) -> Option<&'a ItemStack> {
    items.iter().find(|item| {
        item.is_divination_card()
            && item.is_full_stack()
            && (allow_list.is_empty()
                || allow_list.iter().any(|name| name.eq_ignore_ascii_case(&item.name)))
    })
}

/// Releases the click modifier when the run unwinds, whatever the exit path.
struct ModifierRelease<'a> {
    input: &'a dyn InputDriver,
}

impl Drop for ModifierRelease<'_> {
    fn drop(&mut self) {
        self.input.key_up(click::MODIFIER);
    }
}

/// Drive the full turn-in loop until a stop condition fires or the token
/// cancels it. The modifier key is guaranteed released on return.
pub fn run_turn_in(
    game: &dyn GameView,
    input: &dyn InputDriver,
    cfg: &TaskConfig,
    cancel: &CancelToken,
) -> StopReason {
    logger::info_p(PREFIX, "Starting full divination card turn-in process.");
    let _release = ModifierRelease { input };

    match turn_in_cycles(game, input, cfg, cancel) {
        Ok(reason) => {
            logger::info_p(PREFIX, "All divination card stacks have been processed.");
            reason
        }
        Err(Cancelled) => StopReason::Cancelled,
    }
}

fn turn_in_cycles(
    game: &dyn GameView,
    input: &dyn InputDriver,
    cfg: &TaskConfig,
    cancel: &CancelToken,
) -> Result<StopReason, Cancelled> {
    loop {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let items = game.inventory_items();
        if items.len() >= INVENTORY_CAPACITY {
            logger::info_p(PREFIX, "Inventory is full. Stopping process.");
            return Ok(StopReason::InventoryFull);
        }

        let Some(card) = next_full_stack(&items, &cfg.allow_list) else {
            logger::info_p(PREFIX, "No more full stacks of divination cards found.");
            return Ok(StopReason::NoFullStacks);
        };
        let card_name = card.name.clone();
        let card_center = card.rect.center();

        if game.trade_slot_item().is_some() {
            logger::warn_p(PREFIX, "Trade window is not empty, stopping.");
            return Ok(StopReason::SlotOccupied);
        }

        logger::info_p(PREFIX, &format!("Turning in: {}", card_name));
        perform(input, &click::sequence(card_center, true, cfg.delay_between_actions), cancel)?;
        sleep::sleep_cancellable(cfg.delay_between_actions, cancel)?;

        if game.trade_slot_item().is_none() {
            logger::warn_p(PREFIX, "Card did not move to trade window. Aborting.");
            return Ok(StopReason::MoveFailed);
        }

        let button = match game.trade_button() {
            Some(b) if b.visible => b,
            _ => {
                logger::warn_p(PREFIX, "Could not find the 'Trade' button. Aborting.");
                return Ok(StopReason::TradeButtonMissing);
            }
        };

        let target = button
            .rect
            .center()
            .offset(cfg.trade_button_offset.x, cfg.trade_button_offset.y);
        input.set_cursor(target);
        sleep::sleep_cancellable(cfg.delay_between_actions, cancel)?;
        input.click(MouseButton::Left);
        sleep::sleep_cancellable(cfg.delay_between_actions + TRADE_SETTLE_MS, cancel)?;

        match game.trade_slot_item() {
            Some(reward) => {
                logger::info_p(PREFIX, "Taking reward item.");
                perform(
                    input,
                    &click::sequence(reward.rect.center(), true, cfg.delay_between_actions),
                    cancel,
                )?;
            }
            None => logger::info_p(PREFIX, "No reward item found after trade."),
        }

        logger::info_p(PREFIX, &format!("Pausing for {}ms.", cfg.pause_between_cycles));
        sleep::sleep_cancellable(cfg.pause_between_cycles, cancel)?;
    }
}

/// Execute a click sequence step by step. `Wait` steps are the cancellation
/// checkpoints; input calls themselves are never interrupted.
fn perform(input: &dyn InputDriver, steps: &[Step], cancel: &CancelToken) -> Result<(), Cancelled> {
    for step in steps {
        match *step {
            Step::KeyDown(key) => input.key_down(key),
            Step::KeyUp(key) => input.key_up(key),
            Step::SetCursor(pos) => input.set_cursor(pos),
            Step::Click(button) => input.click(button),
            Step::Wait(ms) => sleep::sleep_cancellable(ms, cancel)?,
        }
    }
    Ok(())
}

/// Handle to the single in-flight turn-in worker. The supervisor sees only
/// the done flag; all other state stays on the worker thread.
pub struct TaskHandle {
    cancel: CancelToken,
    done: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub fn spawn(
        game: Arc<dyn GameView>,
        input: Arc<dyn InputDriver>,
        cfg: TaskConfig,
    ) -> TaskHandle {
        let cancel = CancelToken::new();
        let done = Arc::new(AtomicBool::new(false));
        let worker_cancel = cancel.clone();
        let worker_done = Arc::clone(&done);
        let thread = thread::spawn(move || {
            run_turn_in(game.as_ref(), input.as_ref(), &cfg, &worker_cancel);
            worker_done.store(true, Ordering::Release);
        });
        TaskHandle { cancel, done, thread: Some(thread) }
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Request cancellation and wait for the worker to unwind. Bounded by
    /// the sleep slice, so callers are not stalled noticeably.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn card(name: &str, stack_size: u32, max_stack_size: u32) -> ItemStack {
        ItemStack {
            name: name.to_string(),
            path: format!("{}{}", crate::types::DIV_CARD_PATH, name.replace(' ', "")),
            rect: Rect::new(0, 0, 10, 10),
            stack_size,
            max_stack_size,
        }
    }

    fn currency(name: &str) -> ItemStack {
        ItemStack {
            name: name.to_string(),
            path: format!("Metadata/Items/Currency/{}", name.replace(' ', "")),
            rect: Rect::new(0, 0, 10, 10),
            stack_size: 10,
            max_stack_size: 10,
        }
    }

    #[test]
    fn picks_earliest_full_stack_in_display_order() {
        let items = vec![card("Rain of Chaos", 8, 8), card("The Doctor", 3, 8), card("Destined to Crumble", 5, 5)];
        let picked = next_full_stack(&items, &[]).unwrap();
        assert_eq!(picked.name, "Rain of Chaos");
    }

    #[test]
    fn partial_stacks_are_never_selected() {
        let items = vec![card("The Doctor", 3, 8)];
        assert!(next_full_stack(&items, &[]).is_none());
    }

    #[test]
    fn non_card_full_stacks_are_ignored() {
        let items = vec![currency("Chaos Orb"), card("Rain of Chaos", 8, 8)];
        let picked = next_full_stack(&items, &[]).unwrap();
        assert_eq!(picked.name, "Rain of Chaos");
    }

    #[test]
    fn allow_list_filters_by_name_case_insensitively() {
        let items = vec![card("The Doctor", 8, 8), card("Rain of Chaos", 8, 8)];
        let allow = vec!["rain OF chaos".to_string()];
        let picked = next_full_stack(&items, &allow).unwrap();
        assert_eq!(picked.name, "Rain of Chaos");
    }

    #[test]
    fn allow_list_with_no_match_selects_nothing() {
        let items = vec![card("The Doctor", 8, 8)];
        let allow = vec!["Rain of Chaos".to_string()];
        assert!(next_full_stack(&items, &allow).is_none());
    }

    #[test]
    fn empty_inventory_selects_nothing() {
        assert!(next_full_stack(&[], &[]).is_none());
    }
}
