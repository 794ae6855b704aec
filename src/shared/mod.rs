//! Shared resources, records, events, and errors for Idle Acres.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain's systems directly; the pure
//! reconciliation functions are the only cross-domain calls.

use bevy::ecs::event::Events;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// TIME
// ═══════════════════════════════════════════════════════════════════════

/// Wall-clock milliseconds since the Unix epoch.
pub type Timestamp = u64;

pub const MS_PER_SECOND: u64 = 1_000;

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    pub gold: u64,
    pub energy: u32,
    pub max_energy: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            gold: STARTING_GOLD,
            energy: STARTING_MAX_ENERGY,
            max_energy: STARTING_MAX_ENERGY,
        }
    }
}

impl PlayerState {
    pub fn has_gold(&self, amount: u64) -> bool {
        self.gold >= amount
    }

    pub fn has_energy(&self, amount: u32) -> bool {
        self.energy >= amount
    }

    /// Spend gold if affordable. Returns false and changes nothing otherwise.
    pub fn spend_gold(&mut self, amount: u64) -> bool {
        if !self.has_gold(amount) {
            return false;
        }
        self.gold -= amount;
        true
    }

    pub fn add_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spend energy if available. Returns false and changes nothing otherwise.
    pub fn spend_energy(&mut self, amount: u32) -> bool {
        if !self.has_energy(amount) {
            return false;
        }
        self.energy -= amount;
        true
    }

    /// Restore energy, never above `max_energy`. Returns the amount gained.
    pub fn restore_energy(&mut self, amount: u32) -> u32 {
        let before = self.energy;
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
        self.energy - before
    }

    pub fn refill_energy(&mut self) {
        self.energy = self.max_energy;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type in the game.
/// Using string IDs for data-driven flexibility.
pub type ItemId = String;

/// Crops are keyed by the same id as the item a harvest yields.
pub type CropId = ItemId;

/// Item counts keyed by id. Slot layout is a UI concern and lives elsewhere.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: BTreeMap<ItemId, u32>,
}

impl Inventory {
    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn has(&self, item_id: &str, quantity: u32) -> bool {
        self.count(item_id) >= quantity
    }

    pub fn add(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.items.entry(item_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// What a brand-new farmer starts with.
    pub fn starter() -> Self {
        let mut inventory = Self::default();
        for (item_id, quantity) in STARTER_ITEMS {
            inventory.add(item_id, *quantity);
        }
        inventory
    }

    /// Remove exactly `quantity` or nothing at all.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> bool {
        let held = self.count(item_id);
        if held < quantity {
            return false;
        }
        if held == quantity {
            self.items.remove(item_id);
        } else {
            self.items.insert(item_id.to_string(), held - quantity);
        }
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════
// REFERENCE DATA — loaded once by DataPlugin
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub stackable: bool,
    /// Energy restored when eaten. Zero means the item is not consumable.
    pub energy_restore: u32,
    pub sell_price: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    pub items: HashMap<ItemId, ItemDef>,
}

impl ItemRegistry {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDef {
    pub id: CropId,
    pub name: String,
    pub seed_id: ItemId,
    pub growth_time_seconds: u64,
    pub harvest_amount: u32,
    pub xp_gain: u64,
    pub required_level: u32,
    pub sell_price: u32,
    pub energy_cost: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropRegistry {
    pub crops: HashMap<CropId, CropDef>,
}

impl CropRegistry {
    pub fn get(&self, id: &str) -> Option<&CropDef> {
        self.crops.get(id)
    }

    /// Lookup that treats a missing definition as a data-integrity failure.
    pub fn require(&self, id: &str) -> Result<&CropDef, IdleError> {
        self.get(id).ok_or_else(|| IdleError::UnknownCrop(id.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FARM
// ═══════════════════════════════════════════════════════════════════════

/// One fixed farm slot. Growth state is derived from these fields on every
/// read; nothing about readiness is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plot {
    pub crop_id: Option<CropId>,
    pub planted_at: Option<Timestamp>,
    pub fertilized: bool,
    pub has_weeds: bool,
    /// Zero means never stamped; loading replaces it with the load time.
    pub last_cleared_at: Timestamp,
}

impl Plot {
    pub fn empty(now: Timestamp) -> Self {
        Self {
            last_cleared_at: now,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.crop_id.is_none()
    }

    /// Drop the crop and restart the idle (weed) timer.
    pub fn clear(&mut self, now: Timestamp) {
        self.crop_id = None;
        self.planted_at = None;
        self.fertilized = false;
        self.has_weeds = false;
        self.last_cleared_at = now;
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farm {
    pub plots: Vec<Plot>,
}

impl Default for Farm {
    fn default() -> Self {
        Self::new(PLOT_COUNT, 0)
    }
}

impl Farm {
    pub fn new(plot_count: usize, now: Timestamp) -> Self {
        Self {
            plots: vec![Plot::empty(now); plot_count],
        }
    }

    pub fn plot(&self, index: usize) -> Result<&Plot, IdleError> {
        self.plots.get(index).ok_or(IdleError::InvalidPlotIndex(index))
    }

    pub fn plot_mut(&mut self, index: usize) -> Result<&mut Plot, IdleError> {
        self.plots
            .get_mut(index)
            .ok_or(IdleError::InvalidPlotIndex(index))
    }

    /// Grow or shrink to `plot_count` and give never-stamped plots a weed
    /// timer starting at `now`. Planted plots past the end are logged, then
    /// dropped. Returns how many plots changed.
    pub fn settle(&mut self, plot_count: usize, now: Timestamp) -> usize {
        let mut changed = self.plots.len().abs_diff(plot_count);
        for (index, plot) in self.plots.iter().enumerate().skip(plot_count) {
            if let Some(crop_id) = plot.crop_id.as_deref() {
                warn!(
                    "[Farming] Plot {} dropped with {} still planted (farm shrinks to {} plots)",
                    index, crop_id, plot_count
                );
            }
        }
        self.plots.resize(plot_count, Plot::empty(now));
        for plot in &mut self.plots {
            if plot.last_cleared_at == 0 && now > 0 {
                plot.last_cleared_at = now;
                changed += 1;
            }
        }
        changed
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BANK
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Interest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<u64>,
    pub timestamp: Timestamp,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankAccount {
    pub balance: u64,
    /// `None` until the first deposit. Only ever advances, and only by whole
    /// interest cycles, except when a deposit lands on a zero balance.
    pub last_accrual_at: Option<Timestamp>,
    pub total_interest_earned: u64,
    /// Newest first.
    pub transaction_log: VecDeque<Transaction>,
}

impl BankAccount {
    /// Prepend a transaction and drop the oldest beyond `cap`.
    pub fn log(&mut self, transaction: Transaction, cap: usize) {
        self.transaction_log.push_front(transaction);
        self.transaction_log.truncate(cap);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SKILLS
// ═══════════════════════════════════════════════════════════════════════

pub type SkillId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillRecord {
    pub level: u32,
    pub xp: u64,
}

impl Default for SkillRecord {
    fn default() -> Self {
        Self { level: 1, xp: 0 }
    }
}

/// Per-skill level and XP. Level is always the curve's level for the XP.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLedger {
    pub skills: BTreeMap<SkillId, SkillRecord>,
}

impl Default for SkillLedger {
    fn default() -> Self {
        Self {
            skills: DEFAULT_SKILLS
                .iter()
                .map(|name| (name.to_string(), SkillRecord::default()))
                .collect(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — the notification bus
// ═══════════════════════════════════════════════════════════════════════

/// One notification per externally observable state transition.
/// Queries never produce these.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum IdleEvent {
    CropPlanted {
        plot: usize,
        crop_id: CropId,
        ready_at: Timestamp,
    },
    CropFertilized {
        plot: usize,
        ready_at: Timestamp,
    },
    CropReady {
        plot: usize,
        crop_id: CropId,
    },
    CropHarvested {
        plot: usize,
        crop_id: CropId,
        quantity: u32,
        bonus: bool,
        xp: u64,
    },
    CropDestroyed {
        plot: usize,
        crop_id: CropId,
    },
    WeedsGrown {
        plot: usize,
    },
    WeedsCleared {
        plot: usize,
        byproduct: ItemId,
        energy: u32,
    },
    Deposited {
        amount: u64,
        balance: u64,
        gold: u64,
    },
    Withdrew {
        amount: u64,
        balance: u64,
        gold: u64,
    },
    InterestAccrued {
        interest: u64,
        cycles: u64,
        balance: u64,
    },
    SkillLeveledUp {
        skill: SkillId,
        old_level: u32,
        new_level: u32,
        max_energy: u32,
    },
    EnergyRestored {
        item_id: ItemId,
        energy: u32,
        max_energy: u32,
    },
}

/// Write side of the notification bus. Fire-and-forget.
pub trait EventSink {
    fn emit(&mut self, event: IdleEvent);
}

impl EventSink for Vec<IdleEvent> {
    fn emit(&mut self, event: IdleEvent) {
        self.push(event);
    }
}

impl EventSink for Events<IdleEvent> {
    fn emit(&mut self, event: IdleEvent) {
        self.send(event);
    }
}

impl EventSink for EventWriter<'_, IdleEvent> {
    fn emit(&mut self, event: IdleEvent) {
        self.send(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Plant,
    Fertilize,
    Harvest,
    Destroy,
    ClearWeeds,
    Deposit,
    Withdraw,
    Consume,
}

/// A UI request was rejected; nothing changed.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ActionFailedEvent {
    pub action: ActionKind,
    pub error: IdleError,
}

/// Log a rejected request and tell the UI about it. Data-integrity errors
/// are logged loudly; ordinary rejections are routine.
pub fn report_failure(
    action: ActionKind,
    error: IdleError,
    failures: &mut EventWriter<ActionFailedEvent>,
) {
    if error.is_data_error() {
        error!("[Idle] {:?} aborted: {}", action, error);
    } else {
        info!("[Idle] {:?} rejected: {}", action, error);
    }
    failures.send(ActionFailedEvent { action, error });
}

// ── Requests from UI collaborators ───────────────────────────────────────

#[derive(Event, Debug, Clone)]
pub struct PlantRequest {
    pub plot: usize,
    pub crop_id: CropId,
}

#[derive(Event, Debug, Clone)]
pub struct FertilizeRequest {
    pub plot: usize,
}

#[derive(Event, Debug, Clone)]
pub struct HarvestRequest {
    pub plot: usize,
}

#[derive(Event, Debug, Clone)]
pub struct DestroyRequest {
    pub plot: usize,
}

#[derive(Event, Debug, Clone)]
pub struct ClearWeedsRequest {
    pub plot: usize,
}

#[derive(Event, Debug, Clone)]
pub struct DepositRequest {
    pub amount: i64,
}

#[derive(Event, Debug, Clone)]
pub struct WithdrawRequest {
    pub amount: i64,
}

#[derive(Event, Debug, Clone)]
pub struct ConsumeRequest {
    pub item_id: ItemId,
}

// ═══════════════════════════════════════════════════════════════════════
// RANDOMNESS
// ═══════════════════════════════════════════════════════════════════════

/// Source for bonus rolls. Tests replace it with a seeded generator.
#[derive(Resource)]
pub struct IdleRng(pub StdRng);

impl Default for IdleRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl IdleRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdleError {
    // Plot state
    #[error("plot is already planted")]
    PlotOccupied,

    #[error("plot has no crop")]
    PlotEmpty,

    #[error("crop is not ready yet")]
    NotReady,

    #[error("crop is already ready")]
    CropAlreadyReady,

    #[error("crop is already fertilized")]
    AlreadyFertilized,

    #[error("plot has no weeds")]
    NoWeeds,

    // Resources and gating
    #[error("requires level {required}, have {current}")]
    LevelTooLow { required: u32, current: u32 },

    #[error("missing seed '{0}'")]
    MissingSeed(ItemId),

    #[error("need {required} energy, have {current}")]
    InsufficientEnergy { required: u32, current: u32 },

    #[error("missing fertilizer '{0}'")]
    MissingFertilizer(ItemId),

    #[error("missing item '{0}'")]
    MissingItem(ItemId),

    #[error("item '{0}' cannot be eaten")]
    NotConsumable(ItemId),

    // Bank
    #[error("amount must be positive")]
    InvalidAmount,

    #[error("minimum deposit is {minimum}g")]
    BelowMinimum { minimum: u64 },

    #[error("need {required}g, have {current}g")]
    InsufficientGold { required: u64, current: u64 },

    #[error("bank balance is only {balance}g")]
    InsufficientBalance { balance: u64 },

    #[error("balance cannot exceed {maximum}g")]
    ExceedsMaxBalance { maximum: u64 },

    // Data integrity
    #[error("plot index {0} out of range")]
    InvalidPlotIndex(usize),

    #[error("unknown crop '{0}'")]
    UnknownCrop(CropId),

    #[error("unknown skill '{0}'")]
    UnknownSkill(SkillId),

    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),
}

impl IdleError {
    /// Failures that can only come from bad reference data or a caller bug.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            IdleError::InvalidPlotIndex(_)
                | IdleError::UnknownCrop(_)
                | IdleError::UnknownSkill(_)
                | IdleError::UnknownItem(_)
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const PLOT_COUNT: usize = 9;

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 99;

pub const STARTING_GOLD: u64 = 100;
pub const STARTING_MAX_ENERGY: u32 = 100;

pub const STARTER_ITEMS: &[(&str, u32)] = &[("wheat_seeds", 10), ("carrot_seeds", 5), ("fertilizer", 2)];

pub const FARMING: &str = "farming";
pub const DEFAULT_SKILLS: &[&str] = &[FARMING, "foraging", "mining", "fishing", "cooking", "crafting"];
