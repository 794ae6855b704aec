use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::{idle_tick_due, WallClock};
use crate::config::BalanceConfig;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 2;
/// Oldest document layout `from_json` still migrates.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

const REQUIRED_KEYS: [&str; 3] = ["player", "savedAt", "version"];

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save document is not a JSON object")]
    NotAnObject,

    #[error("save document is missing '{0}'")]
    MissingKey(&'static str),

    #[error("save version {found} is older than the oldest supported ({minimum})")]
    Incompatible { found: u32, minimum: u32 },
}

/// Everything the idle core owns, embedded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerSave {
    #[serde(flatten)]
    pub stats: PlayerState,
    pub inventory: Inventory,
    pub farm: Farm,
    pub bank: BankAccount,
    pub skills: SkillLedger,
}

/// The whole save file. Valid documents carry `player`, `savedAt` and
/// `version` at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocument {
    pub player: PlayerSave,
    pub saved_at: Timestamp,
    pub version: u32,
}

/// Where and how often to save. No path means saving is off.
#[derive(Resource, Debug, Clone, Default)]
pub struct SaveSettings {
    pub path: Option<PathBuf>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct AutosaveTimer {
    pub last_saved_at: Option<Timestamp>,
}

/// Ask for an immediate save to the configured path.
#[derive(Event, Debug, Clone, Default)]
pub struct SaveRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// DOCUMENT
// ═══════════════════════════════════════════════════════════════════════

impl SaveDocument {
    pub fn capture(
        now: Timestamp,
        player: &PlayerState,
        inventory: &Inventory,
        farm: &Farm,
        bank: &BankAccount,
        skills: &SkillLedger,
    ) -> Self {
        Self {
            player: PlayerSave {
                stats: player.clone(),
                inventory: inventory.clone(),
                farm: farm.clone(),
                bank: bank.clone(),
                skills: skills.clone(),
            },
            saved_at: now,
            version: SAVE_VERSION,
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse, check the version, and repair anything the core refuses to
    /// handle. Every timestamp the core relies on is present afterwards.
    pub fn from_json(json: &str, now: Timestamp, config: &BalanceConfig) -> Result<Self, SaveError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or(SaveError::NotAnObject)?;
        for key in REQUIRED_KEYS {
            if !object.contains_key(key) {
                return Err(SaveError::MissingKey(key));
            }
        }

        let mut doc: SaveDocument = serde_json::from_value(value)?;
        if doc.version < MIN_COMPATIBLE_VERSION {
            return Err(SaveError::Incompatible {
                found: doc.version,
                minimum: MIN_COMPATIBLE_VERSION,
            });
        }
        if doc.version > SAVE_VERSION {
            warn!(
                "[Save] Save has version {} but current version is {}. Attempting to load anyway.",
                doc.version, SAVE_VERSION
            );
        }

        let fixes = migrate(&mut doc.player, now, config);
        if fixes > 0 {
            info!("[Save] Migrated save from version {} ({} fixes)", doc.version, fixes);
        }
        doc.version = SAVE_VERSION;
        Ok(doc)
    }

    /// Replace the live resources with this document's contents.
    pub fn install(self, commands: &mut Commands) {
        commands.insert_resource(self.player.stats);
        commands.insert_resource(self.player.inventory);
        commands.insert_resource(self.player.farm);
        commands.insert_resource(self.player.bank);
        commands.insert_resource(self.player.skills);
    }
}

/// Bring loaded records back in line with what the core assumes. Returns
/// the number of repairs made.
pub fn migrate(player: &mut PlayerSave, now: Timestamp, config: &BalanceConfig) -> usize {
    let mut fixes = 0;

    for (index, plot) in player.farm.plots.iter_mut().enumerate() {
        match (&plot.crop_id, plot.planted_at) {
            (Some(crop_id), None) => {
                warn!("[Save] Plot {} has {} with no plant time; using now", index, crop_id);
                plot.planted_at = Some(now);
                fixes += 1;
            }
            (None, Some(_)) => {
                warn!("[Save] Plot {} has a plant time but no crop; clearing", index);
                plot.planted_at = None;
                plot.fertilized = false;
                fixes += 1;
            }
            _ => {}
        }
        if plot.crop_id.is_some() && plot.has_weeds {
            plot.has_weeds = false;
            fixes += 1;
        }
    }
    fixes += player.farm.settle(config.plot_count, now);

    if player.bank.balance > 0 && player.bank.last_accrual_at.is_none() {
        warn!("[Save] Bank balance with no accrual time; starting interest now");
        player.bank.last_accrual_at = Some(now);
        fixes += 1;
    }
    player.bank.transaction_log.truncate(config.transaction_log_cap);

    for skill in DEFAULT_SKILLS {
        if !player.skills.skills.contains_key(*skill) {
            player.skills.skills.insert(skill.to_string(), SkillRecord::default());
            fixes += 1;
        }
    }
    let before = player.skills.clone();
    player.skills.normalize();
    if player.skills != before {
        fixes += 1;
    }

    if player.stats.energy > player.stats.max_energy {
        player.stats.energy = player.stats.max_energy;
        fixes += 1;
    }

    fixes
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE / LOAD LOGIC
// ═══════════════════════════════════════════════════════════════════════

pub fn write_save(path: &Path, doc: &SaveDocument) -> Result<(), SaveError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = doc.to_json()?;
    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn read_save(path: &Path, now: Timestamp, config: &BalanceConfig) -> Result<SaveDocument, SaveError> {
    let json = fs::read_to_string(path)?;
    SaveDocument::from_json(&json, now, config)
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSettings>()
            .init_resource::<AutosaveTimer>()
            .add_event::<SaveRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_systems(Startup, load_on_startup)
            .add_systems(
                Update,
                (
                    autosave.run_if(idle_tick_due),
                    handle_save_request,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::Paused), save_on_pause);
    }
}

fn load_on_startup(
    mut commands: Commands,
    settings: Res<SaveSettings>,
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
) {
    let Some(path) = settings.path.as_deref().filter(|p| p.exists()) else {
        info!("[Save] No save found; starting a new game.");
        commands.insert_resource(Inventory::starter());
        return;
    };
    let now = clock.now();
    match read_save(path, now, &config) {
        Ok(doc) => {
            info!(
                "[Save] Loaded {} (saved {}s ago).",
                path.display(),
                now.saturating_sub(doc.saved_at) / MS_PER_SECOND
            );
            doc.install(&mut commands);
        }
        Err(e) => {
            // Never autosave over an unreadable file.
            error!("[Save] Load from {} FAILED: {}. Saving is off.", path.display(), e);
            commands.insert_resource(SaveSettings::default());
            commands.insert_resource(Inventory::starter());
        }
    }
}

/// Everything a save captures, borrowed from the world.
#[derive(bevy::ecs::system::SystemParam)]
struct SaveSources<'w> {
    clock: Res<'w, WallClock>,
    settings: Res<'w, SaveSettings>,
    player: Res<'w, PlayerState>,
    inventory: Res<'w, Inventory>,
    farm: Res<'w, Farm>,
    bank: Res<'w, BankAccount>,
    skills: Res<'w, SkillLedger>,
}

impl SaveSources<'_> {
    /// `None` when saving is off.
    fn save_now(&self) -> Option<Result<(), SaveError>> {
        let path = self.settings.path.as_deref()?;
        let doc = SaveDocument::capture(
            self.clock.now(),
            &self.player,
            &self.inventory,
            &self.farm,
            &self.bank,
            &self.skills,
        );
        Some(write_save(path, &doc))
    }
}

fn autosave(
    sources: SaveSources,
    config: Res<BalanceConfig>,
    mut timer: ResMut<AutosaveTimer>,
) {
    let now = sources.clock.now();
    let Some(last) = timer.last_saved_at else {
        timer.last_saved_at = Some(now);
        return;
    };
    if now.saturating_sub(last) < config.autosave_interval_ms {
        return;
    }
    timer.last_saved_at = Some(now);
    match sources.save_now() {
        Some(Ok(())) => debug!("[Save] Autosaved."),
        Some(Err(e)) => warn!("[Save] Autosave FAILED: {}", e),
        None => {}
    }
}

fn handle_save_request(
    mut requests: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    mut timer: ResMut<AutosaveTimer>,
    sources: SaveSources,
) {
    // Several requests in one frame collapse into one write.
    if requests.read().count() == 0 {
        return;
    }
    let result = match sources.save_now() {
        Some(result) => result,
        None => {
            warn!("[Save] Save requested but no save path is configured.");
            return;
        }
    };
    timer.last_saved_at = Some(sources.clock.now());
    match result {
        Ok(()) => {
            info!("[Save] Save succeeded.");
            complete_events.send(SaveCompleteEvent {
                success: true,
                error_message: None,
            });
        }
        Err(e) => {
            warn!("[Save] Save FAILED: {}", e);
            complete_events.send(SaveCompleteEvent {
                success: false,
                error_message: Some(e.to_string()),
            });
        }
    }
}

fn save_on_pause(sources: SaveSources) {
    if let Some(Err(e)) = sources.save_now() {
        warn!("[Save] Save on pause FAILED: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: Timestamp = 1_700_000_000_000;

    fn sample() -> SaveDocument {
        let mut farm = Farm::new(PLOT_COUNT, NOW - 5_000);
        farm.plots[2].crop_id = Some("wheat".into());
        farm.plots[2].planted_at = Some(NOW - 1_000);
        let mut inventory = Inventory::default();
        inventory.add("wheat_seeds", 3);
        let bank = BankAccount {
            balance: 250,
            last_accrual_at: Some(NOW - 10),
            ..Default::default()
        };
        SaveDocument::capture(
            NOW,
            &PlayerState::default(),
            &inventory,
            &farm,
            &bank,
            &SkillLedger::default(),
        )
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let json = sample().to_json().unwrap();
        for key in ["\"player\"", "\"savedAt\"", "\"version\"", "\"plantedAt\"", "\"lastAccrualAt\"", "\"maxEnergy\""] {
            assert!(json.contains(key), "missing {}", key);
        }
    }

    #[test]
    fn reload_preserves_state() {
        let doc = sample();
        let json = doc.to_json().unwrap();
        let loaded = SaveDocument::from_json(&json, NOW + 1, &BalanceConfig::default()).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn missing_top_level_key_is_rejected() {
        let json = r#"{"player": {}, "version": 2}"#;
        let err = SaveDocument::from_json(json, NOW, &BalanceConfig::default()).unwrap_err();
        assert!(matches!(err, SaveError::MissingKey("savedAt")));

        let err = SaveDocument::from_json("[1, 2]", NOW, &BalanceConfig::default()).unwrap_err();
        assert!(matches!(err, SaveError::NotAnObject));
    }

    #[test]
    fn ancient_version_is_rejected() {
        let json = r#"{"player": {}, "savedAt": 0, "version": 0}"#;
        let err = SaveDocument::from_json(json, NOW, &BalanceConfig::default()).unwrap_err();
        assert!(matches!(err, SaveError::Incompatible { found: 0, minimum: 1 }));
    }

    #[test]
    fn old_save_gets_timestamps_filled() {
        let json = r#"{
            "version": 1,
            "savedAt": 123,
            "player": {
                "gold": 40,
                "energy": 500,
                "maxEnergy": 100,
                "farm": { "plots": [
                    { "cropId": "wheat", "hasWeeds": true },
                    { "plantedAt": 99, "lastClearedAt": 77 }
                ] },
                "bank": { "balance": 90 },
                "skills": { "skills": { "farming": { "level": 1, "xp": 100 } } }
            }
        }"#;
        let doc = SaveDocument::from_json(json, NOW, &BalanceConfig::default()).unwrap();
        let plots = &doc.player.farm.plots;

        assert_eq!(plots.len(), PLOT_COUNT);
        assert_eq!(plots[0].planted_at, Some(NOW));
        assert!(!plots[0].has_weeds);
        assert_eq!(plots[1].planted_at, None);
        assert_eq!(plots[1].last_cleared_at, 77);
        assert_eq!(plots[5].last_cleared_at, NOW);

        assert_eq!(doc.player.bank.last_accrual_at, Some(NOW));
        assert_eq!(doc.player.skills.level(FARMING).unwrap(), 2);
        assert_eq!(doc.player.skills.level("mining").unwrap(), 1);
        assert_eq!(doc.player.stats.energy, 100);
        assert_eq!(doc.version, SAVE_VERSION);
    }

    #[test]
    fn empty_bank_keeps_unset_accrual_time() {
        let mut player = PlayerSave::default();
        migrate(&mut player, NOW, &BalanceConfig::default());
        assert_eq!(player.bank.last_accrual_at, None);
    }

    #[test]
    fn write_then_read_from_disk() {
        let dir = std::env::temp_dir().join(format!("idle_acres_save_{}", std::process::id()));
        let path = dir.join("slot.json");
        let doc = sample();

        write_save(&path, &doc).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        let loaded = read_save(&path, NOW, &BalanceConfig::default()).unwrap();
        assert_eq!(loaded, doc);

        fs::remove_dir_all(&dir).unwrap();
    }
}
