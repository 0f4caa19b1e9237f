//! Player profile save/load.
//!
//! Bump `SAVE_VERSION` when a field is added; bump `MIN_COMPATIBLE_VERSION`
//! only for breaking changes. Missing fields load as defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PersistError;
use crate::profile::{BoosterId, PlayerProfile, SkinId};

/// localStorage key.
pub const STORAGE_KEY: &str = "rageTapGameState";

const SAVE_VERSION: u32 = 1;

const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Whole-document key-value store holding one snapshot.
pub trait Storage {
    fn read(&self) -> Result<Option<String>, PersistError>;
    fn write(&mut self, json: &str) -> Result<(), PersistError>;
    fn remove(&mut self);
}

/// Storage kept in memory. Used by tests and outside the browser.
#[derive(Default)]
pub struct InMemoryStorage {
    value: Option<String>,
    writes: usize,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_value(json: &str) -> Self {
        Self {
            value: Some(json.to_string()),
            writes: 0,
        }
    }

    /// Number of successful writes so far.
    #[cfg(test)]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for InMemoryStorage {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, json: &str) -> Result<(), PersistError> {
        self.value = Some(json.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self) {
        self.value = None;
    }
}

/// Storage that refuses every write, like a full localStorage quota.
#[cfg(test)]
#[derive(Default)]
pub struct FullStorage;

#[cfg(test)]
impl Storage for FullStorage {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(None)
    }

    fn write(&mut self, _json: &str) -> Result<(), PersistError> {
        Err(PersistError::Storage("QuotaExceededError".into()))
    }

    fn remove(&mut self) {}
}

/// Browser localStorage.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// `None` when there is no window or storage is blocked (private mode etc).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl Storage for LocalStorage {
    fn read(&self) -> Result<Option<String>, PersistError> {
        self.storage
            .get_item(STORAGE_KEY)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, json: &str) -> Result<(), PersistError> {
        self.storage
            .set_item(STORAGE_KEY, json)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self) {
        let _ = self.storage.remove_item(STORAGE_KEY);
    }
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    #[serde(default)]
    profile: ProfileSave,
}

/// Serialized profile. camelCase keys so the JSON
/// stays readable in devtools.
#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProfileSave {
    lives: u32,
    score: u32,
    coins: u32,
    level: u32,
    high_score: u32,
    unlocked_skins: Vec<String>,
    current_skin: String,
    boosters: BTreeMap<String, u32>,
    is_vip: bool,
}

impl Default for ProfileSave {
    fn default() -> Self {
        extract_save(&PlayerProfile::new()).profile
    }
}

fn extract_save(profile: &PlayerProfile) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        profile: ProfileSave {
            lives: profile.lives,
            score: profile.score,
            coins: profile.coins,
            level: profile.level,
            high_score: profile.high_score,
            unlocked_skins: profile
                .unlocked_skins
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            current_skin: profile.current_skin.as_str().to_string(),
            boosters: profile
                .boosters
                .iter()
                .map(|(b, n)| (b.as_str().to_string(), *n))
                .collect(),
            is_vip: profile.is_vip,
        },
    }
}

/// Rebuild a profile from a snapshot. Ids this build does not know are
/// dropped, then the invariants are repaired.
fn apply_save(save: &ProfileSave) -> PlayerProfile {
    let mut profile = PlayerProfile::new();
    profile.lives = save.lives;
    profile.score = save.score;
    profile.coins = save.coins;
    profile.level = save.level;
    profile.high_score = save.high_score;
    profile.unlocked_skins = save
        .unlocked_skins
        .iter()
        .filter_map(|id| SkinId::parse(id))
        .collect();
    profile.current_skin = SkinId::parse(&save.current_skin).unwrap_or(SkinId::Default);
    for (id, count) in &save.boosters {
        if let Some(booster) = BoosterId::parse(id) {
            profile.boosters.insert(booster, *count);
        }
    }
    profile.is_vip = save.is_vip;
    profile.normalize();
    profile
}

fn decode(json: &str) -> Result<PlayerProfile, PersistError> {
    let data: SaveData = serde_json::from_str(json)?;
    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(PersistError::Incompatible {
            saved: data.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    if data.version < SAVE_VERSION {
        debug!(saved = data.version, current = SAVE_VERSION, "migrating older save");
    }
    Ok(apply_save(&data.profile))
}

/// Load the stored profile. Missing or unreadable data yields `None` and the
/// caller starts from defaults; corrupt data is removed so it is not retried.
pub fn load(storage: &mut dyn Storage) -> Option<PlayerProfile> {
    let json = match storage.read() {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "could not read saved profile");
            return None;
        }
    };

    match decode(&json) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "discarding saved profile");
            storage.remove();
            None
        }
    }
}

/// Overwrite the stored snapshot with `profile`.
pub fn save(storage: &mut dyn Storage, profile: &PlayerProfile) -> Result<(), PersistError> {
    let json = serde_json::to_string(&extract_save(profile))?;
    storage.write(&json)
}

/// The live profile and its store. A change is kept only if its save succeeds.
pub struct SaveSlot {
    profile: PlayerProfile,
    storage: Box<dyn Storage>,
}

impl SaveSlot {
    /// Load from `storage`, falling back to a fresh profile.
    pub fn open(mut storage: Box<dyn Storage>) -> Self {
        let profile = load(storage.as_mut()).unwrap_or_default();
        Self { profile, storage }
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    #[cfg(test)]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Apply a mutation and persist it. If the write fails the mutation is
    /// dropped and the live profile stays as it was.
    pub fn commit<T>(&mut self, f: impl FnOnce(&mut PlayerProfile) -> T) -> Result<T, PersistError> {
        self.try_commit(|p| Ok(f(p)))
    }

    /// Apply a fallible mutation to a draft. The draft replaces the live
    /// profile only once `f` succeeded and the snapshot was written.
    pub fn try_commit<T, E: From<PersistError>>(
        &mut self,
        f: impl FnOnce(&mut PlayerProfile) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut draft = self.profile.clone();
        let out = f(&mut draft)?;
        if let Err(e) = save(self.storage.as_mut(), &draft) {
            warn!(error = %e, "profile save failed, change dropped");
            return Err(e.into());
        }
        self.profile = draft;
        Ok(out)
    }
}
