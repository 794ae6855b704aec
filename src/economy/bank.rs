//! Bank — deposits, withdrawals, and compound interest caught up from time.
//!
//! Interest is never ticked. `accrue` counts the whole cycles since
//! `last_accrual_at`, compounds that many times, and advances the timestamp
//! by exactly those cycles so the partial remainder carries into the next
//! call. Deposits and withdrawals accrue first, so call order never changes
//! the outcome.

use bevy::prelude::*;

use crate::config::BalanceConfig;
use crate::rounding::apply_rate_bps;
use crate::shared::*;

/// What one `accrue` call applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accrual {
    pub interest: u64,
    pub cycles: u64,
}

/// Read-only summary for the bank screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankStats {
    pub balance: u64,
    pub total_interest_earned: u64,
    /// `None` while there is nothing earning interest.
    pub next_interest_at: Option<Timestamp>,
    pub ms_until_next_interest: Option<u64>,
    /// Interest the current balance earns in one cycle.
    pub projected_interest: u64,
}

/// Compound the balance for every whole cycle elapsed since the last
/// accrual.
pub fn accrue(
    account: &mut BankAccount,
    now: Timestamp,
    config: &BalanceConfig,
    events: &mut impl EventSink,
) -> Accrual {
    // An empty account must not eat elapsed cycles.
    if account.balance == 0 {
        return Accrual::default();
    }
    let Some(last) = account.last_accrual_at else {
        // Loading normally fills this in; start the clock here otherwise.
        warn!("[Bank] Balance {} with no accrual time; starting now", account.balance);
        account.last_accrual_at = Some(now);
        return Accrual::default();
    };

    let cycle = config.interest_cycle_ms;
    let cycles = now.saturating_sub(last) / cycle;
    if cycles == 0 {
        return Accrual::default();
    }

    let mut interest = 0u64;
    for _ in 0..cycles {
        let step = apply_rate_bps(account.balance, config.interest_rate_bps);
        // Balance can no longer change; skip the remaining iterations.
        if step == 0 || account.balance == u64::MAX {
            break;
        }
        account.balance = account.balance.saturating_add(step);
        interest = interest.saturating_add(step);
    }

    account.last_accrual_at = Some(last.saturating_add(cycles.saturating_mul(cycle)));
    account.total_interest_earned = account.total_interest_earned.saturating_add(interest);

    if interest > 0 {
        account.log(
            Transaction {
                kind: TransactionKind::Interest,
                amount: interest,
                cycles: Some(cycles),
                timestamp: now,
            },
            config.transaction_log_cap,
        );
        info!(
            "[Bank] Interest +{}g over {} cycle(s). Balance: {}g",
            interest, cycles, account.balance
        );
        events.emit(IdleEvent::InterestAccrued {
            interest,
            cycles,
            balance: account.balance,
        });
    }

    Accrual { interest, cycles }
}

/// Move gold from the player into the bank.
pub fn deposit(
    account: &mut BankAccount,
    player: &mut PlayerState,
    amount: i64,
    now: Timestamp,
    config: &BalanceConfig,
    events: &mut impl EventSink,
) -> Result<u64, IdleError> {
    accrue(account, now, config, events);

    let amount = positive_amount(amount)?;
    if amount < config.min_deposit {
        return Err(IdleError::BelowMinimum {
            minimum: config.min_deposit,
        });
    }
    if !player.has_gold(amount) {
        return Err(IdleError::InsufficientGold {
            required: amount,
            current: player.gold,
        });
    }
    match account.balance.checked_add(amount) {
        Some(total) if total <= config.max_balance => {}
        _ => {
            return Err(IdleError::ExceedsMaxBalance {
                maximum: config.max_balance,
            })
        }
    }

    // Interest starts fresh from the moment money lands in an empty account.
    if account.balance == 0 {
        account.last_accrual_at = Some(now);
    }
    player.spend_gold(amount);
    account.balance += amount;
    account.log(
        Transaction {
            kind: TransactionKind::Deposit,
            amount,
            cycles: None,
            timestamp: now,
        },
        config.transaction_log_cap,
    );

    info!("[Bank] Deposited {}g. Balance: {}g", amount, account.balance);
    events.emit(IdleEvent::Deposited {
        amount,
        balance: account.balance,
        gold: player.gold,
    });
    Ok(account.balance)
}

/// Move gold from the bank back to the player.
pub fn withdraw(
    account: &mut BankAccount,
    player: &mut PlayerState,
    amount: i64,
    now: Timestamp,
    config: &BalanceConfig,
    events: &mut impl EventSink,
) -> Result<u64, IdleError> {
    accrue(account, now, config, events);

    let amount = positive_amount(amount)?;
    if amount > account.balance {
        return Err(IdleError::InsufficientBalance {
            balance: account.balance,
        });
    }

    account.balance -= amount;
    player.add_gold(amount);
    account.log(
        Transaction {
            kind: TransactionKind::Withdraw,
            amount,
            cycles: None,
            timestamp: now,
        },
        config.transaction_log_cap,
    );

    info!("[Bank] Withdrew {}g. Balance: {}g", amount, account.balance);
    events.emit(IdleEvent::Withdrew {
        amount,
        balance: account.balance,
        gold: player.gold,
    });
    Ok(account.balance)
}

pub fn bank_stats(account: &BankAccount, now: Timestamp, config: &BalanceConfig) -> BankStats {
    let next_interest_at = match account.last_accrual_at {
        Some(last) if account.balance > 0 => {
            let cycle = config.interest_cycle_ms;
            let elapsed_cycles = now.saturating_sub(last) / cycle;
            Some(last.saturating_add((elapsed_cycles + 1).saturating_mul(cycle)))
        }
        _ => None,
    };
    BankStats {
        balance: account.balance,
        total_interest_earned: account.total_interest_earned,
        next_interest_at,
        ms_until_next_interest: next_interest_at.map(|at| at.saturating_sub(now)),
        projected_interest: apply_rate_bps(account.balance, config.interest_rate_bps),
    }
}

fn positive_amount(amount: i64) -> Result<u64, IdleError> {
    u64::try_from(amount)
        .ok()
        .filter(|&a| a > 0)
        .ok_or(IdleError::InvalidAmount)
}
