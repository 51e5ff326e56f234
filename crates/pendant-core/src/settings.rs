//! Persisted integer settings.

use heapless::{String, Vec};
use log::warn;

/// Namespace holding every pendant setting.
pub const NAMESPACE: &str = "pendant";
/// Display rotation in quarter turns.
pub const KEY_ROTATION: &str = "rotation";

pub const KEY_BYTES: usize = 15;

/// Screen orientation; the two states the rotary toggle flips between.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Orientation {
    /// Panel as mounted in the enclosure (rotated 180 degrees).
    #[default]
    Normal,
    Flipped,
}

impl Orientation {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Flipped,
            Self::Flipped => Self::Normal,
        }
    }

    /// Rotation in quarter turns as stored under [`KEY_ROTATION`].
    pub const fn quarter_turns(self) -> i32 {
        match self {
            Self::Normal => 2,
            Self::Flipped => 0,
        }
    }

    /// Unknown values read back as `Normal`.
    pub const fn from_quarter_turns(value: i32) -> Self {
        match value {
            0 => Self::Flipped,
            _ => Self::Normal,
        }
    }
}

/// Key/value backend, opened around each access.
pub trait SettingsStore {
    type Error;

    fn open(&mut self, namespace: &str, read_only: bool) -> Result<(), Self::Error>;
    fn get_i32(&mut self, key: &str, default: i32) -> i32;
    fn set_i32(&mut self, key: &str, value: i32) -> Result<(), Self::Error>;
    fn close(&mut self);
}

/// Opens `namespace`, runs `f`, and always closes the store afterwards.
pub fn scoped<S, T>(
    store: &mut S,
    namespace: &str,
    read_only: bool,
    f: impl FnOnce(&mut S) -> Result<T, S::Error>,
) -> Result<T, S::Error>
where
    S: SettingsStore,
{
    store.open(namespace, read_only)?;
    let result = f(store);
    store.close();
    result
}

pub fn load_orientation<S: SettingsStore>(store: &mut S) -> Orientation {
    let default = Orientation::default().quarter_turns();
    match scoped(store, NAMESPACE, true, |s| Ok(s.get_i32(KEY_ROTATION, default))) {
        Ok(value) => Orientation::from_quarter_turns(value),
        Err(_) => {
            warn!("settings: rotation unreadable; using default");
            Orientation::default()
        }
    }
}

pub fn save_orientation<S: SettingsStore>(
    store: &mut S,
    orientation: Orientation,
) -> Result<(), S::Error> {
    scoped(store, NAMESPACE, false, |s| {
        s.set_i32(KEY_ROTATION, orientation.quarter_turns())
    })
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemorySettingsError {
    NotOpen,
    ReadOnly,
    Full,
    KeyTooLong,
}

type Entry = (String<KEY_BYTES>, String<KEY_BYTES>, i32);

/// Volatile store used when flash is unavailable, and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    entries: Vec<Entry, 8>,
    namespace: Option<String<KEY_BYTES>>,
    read_only: bool,
    open_count: u32,
}

impl MemorySettings {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            namespace: None,
            read_only: true,
            open_count: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.namespace.is_some()
    }

    /// Number of `open` calls so far.
    pub fn open_count(&self) -> u32 {
        self.open_count
    }

    fn position(&self, key: &str) -> Option<usize> {
        let namespace = self.namespace.as_ref()?;
        self.entries
            .iter()
            .position(|(ns, k, _)| ns == namespace && k == key)
    }
}

impl SettingsStore for MemorySettings {
    type Error = MemorySettingsError;

    fn open(&mut self, namespace: &str, read_only: bool) -> Result<(), Self::Error> {
        let namespace =
            String::try_from(namespace).map_err(|_| MemorySettingsError::KeyTooLong)?;
        self.namespace = Some(namespace);
        self.read_only = read_only;
        self.open_count = self.open_count.saturating_add(1);
        Ok(())
    }

    fn get_i32(&mut self, key: &str, default: i32) -> i32 {
        self.position(key)
            .map(|i| self.entries[i].2)
            .unwrap_or(default)
    }

    fn set_i32(&mut self, key: &str, value: i32) -> Result<(), Self::Error> {
        let Some(namespace) = self.namespace.clone() else {
            return Err(MemorySettingsError::NotOpen);
        };
        if self.read_only {
            return Err(MemorySettingsError::ReadOnly);
        }

        if let Some(i) = self.position(key) {
            self.entries[i].2 = value;
            return Ok(());
        }

        let key = String::try_from(key).map_err(|_| MemorySettingsError::KeyTooLong)?;
        self.entries
            .push((namespace, key, value))
            .map_err(|_| MemorySettingsError::Full)
    }

    fn close(&mut self) {
        self.namespace = None;
        self.read_only = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_default_orientation() {
        let mut store = MemorySettings::new();

        assert_eq!(load_orientation(&mut store), Orientation::Normal);
        assert!(!store.is_open());
    }

    #[test]
    fn saved_orientation_survives_reload() {
        let mut store = MemorySettings::new();

        save_orientation(&mut store, Orientation::Flipped).unwrap();
        let mut reloaded = store.clone();

        assert_eq!(load_orientation(&mut reloaded), Orientation::Flipped);
        assert_eq!(store.get_i32(KEY_ROTATION, -1), -1, "closed store reads default");
    }

    #[test]
    fn writes_need_a_writable_scope() {
        let mut store = MemorySettings::new();

        assert_eq!(store.set_i32(KEY_ROTATION, 0), Err(MemorySettingsError::NotOpen));
        let err = scoped(&mut store, NAMESPACE, true, |s| s.set_i32(KEY_ROTATION, 0));
        assert_eq!(err, Err(MemorySettingsError::ReadOnly));
        assert!(!store.is_open());
    }

    #[test]
    fn unknown_stored_rotation_reads_as_normal() {
        assert_eq!(Orientation::from_quarter_turns(3), Orientation::Normal);
        assert_eq!(Orientation::from_quarter_turns(0), Orientation::Flipped);
        assert_eq!(Orientation::Normal.toggled().toggled(), Orientation::Normal);
    }
}
