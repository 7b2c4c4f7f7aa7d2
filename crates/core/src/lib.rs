//! Automated divination-card turn-in: a tick-driven supervisor over a single
//! cancellable click/wait worker, behind external game-view and input facades.

pub mod click;
pub mod controller;
pub mod logger;
pub mod platform;
pub mod settings;
pub mod sleep;
pub mod task;
pub mod types;
