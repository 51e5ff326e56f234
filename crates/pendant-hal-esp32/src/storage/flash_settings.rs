use embedded_storage::{ReadStorage, Storage};
use esp_bootloader_esp_idf::partitions::{
    DataPartitionSubType, PARTITION_TABLE_MAX_LEN, PartitionType, read_partition_table,
};
use esp_rom_sys::rom::spiflash::{
    ESP_ROM_SPIFLASH_RESULT_OK, esp_rom_spiflash_erase_sector, esp_rom_spiflash_read,
    esp_rom_spiflash_unlock, esp_rom_spiflash_write,
};
use heapless::Vec;
use log::{debug, warn};
use pendant_core::settings::SettingsStore;

const FLASH_SECTOR_SIZE: u32 = 4096;
const DEFAULT_FLASH_CAPACITY_BYTES: usize = 4 * 1024 * 1024;

const SETTINGS_MAGIC: u32 = 0x3144_4E50; // "PND1"
const SETTINGS_VERSION: u8 = 1;
const MAX_ENTRIES: usize = 8;
const ENTRY_LEN: usize = 8;
const HEADER_LEN: usize = 8;
const CHECKSUM_AT: usize = HEADER_LEN + MAX_ENTRIES * ENTRY_LEN;
const SETTINGS_RECORD_LEN: usize = CHECKSUM_AT + 4;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FlashSettingsError {
    PartitionTable,
    SettingsPartitionMissing,
    PartitionTooSmall,
    FlashOpFailed(i32),
    Corrupted,
    Unsupported,
    NotOpen,
    ReadOnly,
    Full,
}

#[derive(Debug)]
struct RawFlash;

impl RawFlash {
    fn new() -> Result<Self, FlashSettingsError> {
        let rc = unsafe { esp_rom_spiflash_unlock() };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(Self)
    }

    fn erase_sector(&mut self, sector_addr: u32) -> Result<(), FlashSettingsError> {
        if !sector_addr.is_multiple_of(FLASH_SECTOR_SIZE) {
            return Err(FlashSettingsError::Unsupported);
        }

        let rc = unsafe { esp_rom_spiflash_erase_sector(sector_addr / FLASH_SECTOR_SIZE) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(())
    }

    fn read_word(&mut self, addr: u32) -> Result<u32, FlashSettingsError> {
        if !addr.is_multiple_of(4) {
            return Err(FlashSettingsError::Unsupported);
        }

        let mut word = 0u32;
        let rc = unsafe { esp_rom_spiflash_read(addr, &mut word as *mut u32 as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(word)
    }

    fn write_word(&mut self, addr: u32, word: u32) -> Result<(), FlashSettingsError> {
        if !addr.is_multiple_of(4) {
            return Err(FlashSettingsError::Unsupported);
        }

        let rc = unsafe { esp_rom_spiflash_write(addr, &word as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashSettingsError::FlashOpFailed(rc));
        }
        Ok(())
    }

    /// Word-wise read; `addr` may be unaligned.
    fn read_bytes(&mut self, addr: u32, out: &mut [u8]) -> Result<(), FlashSettingsError> {
        let start = addr & !0b11;
        let end = (addr + out.len() as u32 + 3) & !0b11;
        let mut filled = 0usize;

        for word_addr in (start..end).step_by(4) {
            let bytes = self.read_word(word_addr)?.to_le_bytes();
            for (i, b) in bytes.iter().enumerate() {
                let at = word_addr + i as u32;
                if at < addr {
                    continue;
                }
                let dst = (at - addr) as usize;
                if dst >= out.len() {
                    break;
                }
                out[dst] = *b;
                filled += 1;
            }
        }

        if filled == out.len() {
            Ok(())
        } else {
            Err(FlashSettingsError::Corrupted)
        }
    }

    /// Record lengths are word multiples, so aligned writes cover them.
    fn write_erased_words(&mut self, addr: u32, data: &[u8]) -> Result<(), FlashSettingsError> {
        if !addr.is_multiple_of(4) || !data.len().is_multiple_of(4) {
            return Err(FlashSettingsError::Unsupported);
        }

        for (i, chunk) in data.chunks_exact(4).enumerate() {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            self.write_word(addr + (i * 4) as u32, word)?;
        }
        Ok(())
    }
}

impl ReadStorage for RawFlash {
    type Error = FlashSettingsError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.read_bytes(offset, bytes)
    }

    fn capacity(&self) -> usize {
        DEFAULT_FLASH_CAPACITY_BYTES
    }
}

impl Storage for RawFlash {
    fn write(&mut self, _offset: u32, _bytes: &[u8]) -> Result<(), Self::Error> {
        Err(FlashSettingsError::Unsupported)
    }
}

/// Integer key/value table kept in the last sector of the first writable
/// data partition. Keys are stored as hashes of `namespace` and `key`.
#[derive(Debug)]
pub struct FlashSettingsStore {
    flash: RawFlash,
    settings_sector_addr: u32,
    entries: Vec<(u32, i32), MAX_ENTRIES>,
    namespace_seed: Option<u32>,
    read_only: bool,
}

impl FlashSettingsStore {
    pub fn new() -> Result<Self, FlashSettingsError> {
        let mut flash = RawFlash::new()?;

        let mut table_buf = [0u8; PARTITION_TABLE_MAX_LEN];
        let table = read_partition_table(&mut flash, &mut table_buf)
            .map_err(|_| FlashSettingsError::PartitionTable)?;

        let mut data_undefined: Option<(u32, u32)> = None;
        let mut fallback_nvs: Option<(u32, u32)> = None;

        for entry in table.iter() {
            if entry.is_read_only() || entry.len() < FLASH_SECTOR_SIZE {
                continue;
            }

            match entry.partition_type() {
                PartitionType::Data(DataPartitionSubType::Undefined) => {
                    data_undefined = Some((entry.offset(), entry.len()));
                    break;
                }
                PartitionType::Data(DataPartitionSubType::Nvs) if fallback_nvs.is_none() => {
                    fallback_nvs = Some((entry.offset(), entry.len()));
                }
                _ => {}
            }
        }

        let (offset, len) = data_undefined
            .or(fallback_nvs)
            .ok_or(FlashSettingsError::SettingsPartitionMissing)?;

        if len < FLASH_SECTOR_SIZE {
            return Err(FlashSettingsError::PartitionTooSmall);
        }

        Ok(Self {
            flash,
            settings_sector_addr: offset + len - FLASH_SECTOR_SIZE,
            entries: Vec::new(),
            namespace_seed: None,
            read_only: true,
        })
    }

    fn load(&mut self) -> Result<(), FlashSettingsError> {
        let mut buf = [0u8; SETTINGS_RECORD_LEN];
        self.flash.read_bytes(self.settings_sector_addr, &mut buf)?;
        self.entries = decode_record(&buf)?;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), FlashSettingsError> {
        let buf = encode_record(&self.entries);
        self.flash.erase_sector(self.settings_sector_addr)?;
        self.flash
            .write_erased_words(self.settings_sector_addr, &buf)
    }
}

impl SettingsStore for FlashSettingsStore {
    type Error = FlashSettingsError;

    fn open(&mut self, namespace: &str, read_only: bool) -> Result<(), Self::Error> {
        match self.load() {
            Ok(()) => {}
            Err(FlashSettingsError::Corrupted) => {
                warn!("settings: stored record corrupted; starting empty");
                self.entries.clear();
            }
            Err(err) => return Err(err),
        }

        self.namespace_seed = Some(checksum32(namespace.as_bytes()));
        self.read_only = read_only;
        Ok(())
    }

    fn get_i32(&mut self, key: &str, default: i32) -> i32 {
        let Some(seed) = self.namespace_seed else {
            return default;
        };
        let hash = key_hash(seed, key);
        self.entries
            .iter()
            .find(|(h, _)| *h == hash)
            .map(|(_, value)| *value)
            .unwrap_or(default)
    }

    fn set_i32(&mut self, key: &str, value: i32) -> Result<(), Self::Error> {
        let seed = self.namespace_seed.ok_or(FlashSettingsError::NotOpen)?;
        if self.read_only {
            return Err(FlashSettingsError::ReadOnly);
        }

        let hash = key_hash(seed, key);
        match self.entries.iter_mut().find(|(h, _)| *h == hash) {
            Some(entry) if entry.1 == value => return Ok(()),
            Some(entry) => entry.1 = value,
            None => self
                .entries
                .push((hash, value))
                .map_err(|_| FlashSettingsError::Full)?,
        }

        debug!("settings: writing {} entries", self.entries.len());
        self.persist()
    }

    fn close(&mut self) {
        self.namespace_seed = None;
        self.read_only = true;
    }
}

/// An erased or foreign sector reads as an empty table.
fn decode_record(
    buf: &[u8; SETTINGS_RECORD_LEN],
) -> Result<Vec<(u32, i32), MAX_ENTRIES>, FlashSettingsError> {
    let mut entries = Vec::new();

    let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if magic != SETTINGS_MAGIC || buf[4] != SETTINGS_VERSION {
        return Ok(entries);
    }

    let expected = u32::from_le_bytes([
        buf[CHECKSUM_AT],
        buf[CHECKSUM_AT + 1],
        buf[CHECKSUM_AT + 2],
        buf[CHECKSUM_AT + 3],
    ]);
    if checksum32(&buf[..CHECKSUM_AT]) != expected {
        return Err(FlashSettingsError::Corrupted);
    }

    let count = buf[5] as usize;
    if count > MAX_ENTRIES {
        return Err(FlashSettingsError::Corrupted);
    }

    for slot in buf[HEADER_LEN..CHECKSUM_AT].chunks_exact(ENTRY_LEN).take(count) {
        let hash = u32::from_le_bytes([slot[0], slot[1], slot[2], slot[3]]);
        let value = i32::from_le_bytes([slot[4], slot[5], slot[6], slot[7]]);
        entries
            .push((hash, value))
            .map_err(|_| FlashSettingsError::Corrupted)?;
    }
    Ok(entries)
}

fn encode_record(entries: &[(u32, i32)]) -> [u8; SETTINGS_RECORD_LEN] {
    let mut buf = [0u8; SETTINGS_RECORD_LEN];
    buf[0..4].copy_from_slice(&SETTINGS_MAGIC.to_le_bytes());
    buf[4] = SETTINGS_VERSION;
    buf[5] = entries.len() as u8;

    for (slot, (hash, value)) in buf[HEADER_LEN..CHECKSUM_AT]
        .chunks_exact_mut(ENTRY_LEN)
        .zip(entries)
    {
        slot[0..4].copy_from_slice(&hash.to_le_bytes());
        slot[4..8].copy_from_slice(&value.to_le_bytes());
    }

    let checksum = checksum32(&buf[..CHECKSUM_AT]);
    buf[CHECKSUM_AT..].copy_from_slice(&checksum.to_le_bytes());
    buf
}

fn key_hash(seed: u32, key: &str) -> u32 {
    fnv1a(seed, key.as_bytes())
}

fn checksum32(bytes: &[u8]) -> u32 {
    fnv1a(0x811C9DC5, bytes)
}

fn fnv1a(seed: u32, bytes: &[u8]) -> u32 {
    let mut hash = seed;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}
