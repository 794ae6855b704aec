//! Economy domain — the bank account and eating food.
//!
//! All cross-domain communication goes through `crate::shared::*` events and resources.
//! No other domain module is imported here.

use bevy::prelude::*;
use crate::clock::{idle_tick_due, WallClock};
use crate::config::BalanceConfig;
use crate::shared::*;

pub mod bank;
pub mod consume;

pub use bank::{accrue, bank_stats, deposit, withdraw, Accrual, BankStats};
pub use consume::consume;

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        // ── Resources ──────────────────────────────────────────────────────
        app.init_resource::<BankAccount>()
            .init_resource::<PlayerState>()
            .init_resource::<Inventory>()
            .init_resource::<ItemRegistry>();

        // ── Events ─────────────────────────────────────────────────────────
        app.add_event::<IdleEvent>()
            .add_event::<ActionFailedEvent>()
            .add_event::<DepositRequest>()
            .add_event::<WithdrawRequest>()
            .add_event::<ConsumeRequest>();

        // ── Systems: Playing state ─────────────────────────────────────────
        app.add_systems(
            Update,
            (
                handle_deposit_requests,
                handle_withdraw_requests,
                handle_consume_requests,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            accrue_interest
                .before(handle_deposit_requests)
                .run_if(in_state(GameState::Playing))
                .run_if(idle_tick_due),
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Catch interest up on every tick so a returning player sees it at once.
pub fn accrue_interest(
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    mut account: ResMut<BankAccount>,
    mut events: EventWriter<IdleEvent>,
) {
    accrue(&mut account, clock.now(), &config, &mut events);
}

pub fn handle_deposit_requests(
    mut requests: EventReader<DepositRequest>,
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    mut account: ResMut<BankAccount>,
    mut player: ResMut<PlayerState>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    let now = clock.now();
    for request in requests.read() {
        if let Err(err) = deposit(&mut account, &mut player, request.amount, now, &config, &mut events) {
            report_failure(ActionKind::Deposit, err, &mut failures);
        }
    }
}

pub fn handle_withdraw_requests(
    mut requests: EventReader<WithdrawRequest>,
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    mut account: ResMut<BankAccount>,
    mut player: ResMut<PlayerState>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    let now = clock.now();
    for request in requests.read() {
        if let Err(err) = withdraw(&mut account, &mut player, request.amount, now, &config, &mut events) {
            report_failure(ActionKind::Withdraw, err, &mut failures);
        }
    }
}

pub fn handle_consume_requests(
    mut requests: EventReader<ConsumeRequest>,
    items: Res<ItemRegistry>,
    mut player: ResMut<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    for request in requests.read() {
        if let Err(err) = consume(&request.item_id, &items, &mut player, &mut inventory, &mut events) {
            report_failure(ActionKind::Consume, err, &mut failures);
        }
    }
}
