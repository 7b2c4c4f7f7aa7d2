use divtrader_core::platform::stub::{
    card_stack, currency_item, inventory_rect, InputEvent, StubWorld, SLOT_RECT, TRADE_BUTTON_RECT,
};
use divtrader_core::task::{run_turn_in, StopReason, TaskConfig};
use divtrader_core::types::{CancelToken, Key, MouseButton, Point};

fn fast_config() -> TaskConfig {
    TaskConfig {
        delay_between_actions: 0,
        pause_between_cycles: 0,
        allow_list: Vec::new(),
        trade_button_offset: Point::default(),
    }
}

fn run(world: &StubWorld, cfg: &TaskConfig) -> StopReason {
    let game = world.game();
    let input = world.input();
    run_turn_in(game.as_ref(), input.as_ref(), cfg, &CancelToken::new())
}

#[test]
fn processes_every_full_stack_and_leaves_partials() {
    let world = StubWorld::new();
    world.set_inventory(vec![
        card_stack(0, "Rain of Chaos", 8, 8),
        card_stack(1, "The Doctor", 3, 8),
        card_stack(2, "Destined to Crumble", 5, 5),
    ]);

    assert_eq!(run(&world, &fast_config()), StopReason::NoFullStacks);

    let names: Vec<String> = world.inventory().into_iter().map(|i| i.name).collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"The Doctor".to_string()));
    assert!(names.contains(&"Chaos Orb".to_string()));
    assert!(names.contains(&"Corrupted Body Armour".to_string()));
    assert!(world.slot_item().is_none());
    assert!(!world.ctrl_held());
}

#[test]
fn successful_cycle_emits_the_exact_input_order() {
    let world = StubWorld::new();
    world.set_inventory(vec![card_stack(0, "Rain of Chaos", 8, 8)]);

    assert_eq!(run(&world, &fast_config()), StopReason::NoFullStacks);

    let events = world.events();
    let expected_cycle = [
        InputEvent::KeyDown(Key::LCtrl),
        InputEvent::SetCursor(inventory_rect(0).center()),
        InputEvent::Click(MouseButton::Left),
        InputEvent::KeyUp(Key::LCtrl),
        InputEvent::SetCursor(TRADE_BUTTON_RECT.center()),
        InputEvent::Click(MouseButton::Left),
        InputEvent::KeyDown(Key::LCtrl),
        InputEvent::SetCursor(SLOT_RECT.center()),
        InputEvent::Click(MouseButton::Left),
        InputEvent::KeyUp(Key::LCtrl),
    ];
    assert_eq!(events[..10], expected_cycle);
    // the drop guard releases the modifier once more on exit
    assert_eq!(events.len(), 11);
    assert_eq!(events[10], InputEvent::KeyUp(Key::LCtrl));
}

#[test]
fn full_inventory_stops_before_any_click() {
    let world = StubWorld::new();
    let mut items: Vec<_> = (0..59).map(|i| currency_item(i, "Scroll of Wisdom")).collect();
    items.push(card_stack(59, "Rain of Chaos", 8, 8));
    world.set_inventory(items);

    assert_eq!(run(&world, &fast_config()), StopReason::InventoryFull);
    assert_eq!(world.events(), vec![InputEvent::KeyUp(Key::LCtrl)]);
}

#[test]
fn occupied_slot_stops_without_clicking_or_clearing() {
    let world = StubWorld::new();
    world.set_inventory(vec![card_stack(0, "Rain of Chaos", 8, 8)]);
    world.set_slot_item(card_stack(0, "The Fiend", 11, 11));

    assert_eq!(run(&world, &fast_config()), StopReason::SlotOccupied);
    assert_eq!(world.events(), vec![InputEvent::KeyUp(Key::LCtrl)]);
    assert_eq!(world.slot_item().map(|i| i.name), Some("The Fiend".to_string()));
}

#[test]
fn allow_list_only_trades_matching_cards() {
    let world = StubWorld::new();
    world.set_inventory(vec![
        card_stack(0, "The Doctor", 8, 8),
        card_stack(1, "Rain of Chaos", 8, 8),
    ]);
    let cfg = TaskConfig { allow_list: vec!["Rain of Chaos".to_string()], ..fast_config() };

    assert_eq!(run(&world, &cfg), StopReason::NoFullStacks);

    let names: Vec<String> = world.inventory().into_iter().map(|i| i.name).collect();
    assert!(names.contains(&"The Doctor".to_string()));
    assert!(names.contains(&"Chaos Orb".to_string()));
    assert!(!names.contains(&"Rain of Chaos".to_string()));
}

#[test]
fn unregistered_move_aborts_the_run() {
    let world = StubWorld::new();
    world.set_inventory(vec![card_stack(0, "Rain of Chaos", 8, 8)]);
    world.set_ignore_moves(true);

    assert_eq!(run(&world, &fast_config()), StopReason::MoveFailed);
    // one modifier click sequence, then the guard release
    assert_eq!(world.events().len(), 5);
    assert!(!world.ctrl_held());
    assert_eq!(world.inventory().len(), 1);
}

#[test]
fn hidden_trade_button_aborts_with_the_card_left_in_the_slot() {
    let world = StubWorld::new();
    world.set_inventory(vec![card_stack(0, "Rain of Chaos", 8, 8)]);
    world.set_trade_button_visible(false);

    assert_eq!(run(&world, &fast_config()), StopReason::TradeButtonMissing);
    assert_eq!(world.slot_item().map(|i| i.name), Some("Rain of Chaos".to_string()));
    assert!(!world.ctrl_held());
}

#[test]
fn missing_reward_is_not_fatal() {
    let world = StubWorld::new();
    world.set_inventory(vec![
        card_stack(0, "Rain of Chaos", 8, 8),
        card_stack(1, "Destined to Crumble", 5, 5),
    ]);
    world.set_grant_reward(false);

    assert_eq!(run(&world, &fast_config()), StopReason::NoFullStacks);
    assert!(world.inventory().is_empty());
    // two 6-event cycles (no reward pickup), then the guard release
    assert_eq!(world.events().len(), 13);
}

#[test]
fn cancelled_token_stops_before_any_click() {
    let world = StubWorld::new();
    world.set_inventory(vec![card_stack(0, "Rain of Chaos", 8, 8)]);
    let cancel = CancelToken::new();
    cancel.cancel();

    let game = world.game();
    let input = world.input();
    let reason = run_turn_in(game.as_ref(), input.as_ref(), &fast_config(), &cancel);

    assert_eq!(reason, StopReason::Cancelled);
    assert_eq!(world.events(), vec![InputEvent::KeyUp(Key::LCtrl)]);
    assert_eq!(world.inventory().len(), 1);
}

#[test]
fn confirm_click_honours_the_configured_offset() {
    let world = StubWorld::new();
    world.set_inventory(vec![card_stack(0, "Rain of Chaos", 8, 8)]);
    let cfg = TaskConfig { trade_button_offset: Point { x: 10, y: -5 }, ..fast_config() };

    assert_eq!(run(&world, &cfg), StopReason::NoFullStacks);

    let expected = TRADE_BUTTON_RECT.center().offset(10, -5);
    assert_eq!(world.events()[4], InputEvent::SetCursor(expected));
}
