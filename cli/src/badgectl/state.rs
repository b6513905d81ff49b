// cli/src/badgectl/state.rs
// Persistent badge state between simulated boots
// - rtc: the battery-backed RTC bytes (mode tag at 0, complement at 1)
// - boots: power cycles simulated so far

use std::fs;
use std::path::{Path, PathBuf};

use badge_kernel::boot::rtc::{BootMode, ModeRecord, ModeRegister};
use badge_kernel::hal::RtcMemory;
use serde::{Deserialize, Serialize};

use super::error::{CliError, Result};

pub const RTC_BYTES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub rtc: [u8; RTC_BYTES],
    pub boots: u32,
    #[serde(skip)]
    path: PathBuf,
}

impl DeviceState {
    /// Load the state file; a missing file is a badge with zeroed RTC memory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut state = if path.exists() {
            let raw = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            serde_json::from_str(&raw).map_err(|source| CliError::State { path: path.into(), source })?
        } else {
            DeviceState { rtc: [0; RTC_BYTES], boots: 0, path: PathBuf::new() }
        };
        state.path = path.to_path_buf();
        Ok(state)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| CliError::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| CliError::State { path: self.path.clone(), source })?;
        fs::write(&self.path, json).map_err(|e| CliError::io(&self.path, e))
    }

    pub fn record(&self) -> ModeRecord {
        ModeRegister::read(self)
    }

    /// Arm `mode`; `corrupt` stores a complement that will not validate.
    pub fn arm(&mut self, mode: BootMode, corrupt: bool) {
        let mut record = ModeRecord::sealed(mode);
        if corrupt {
            record.check = record.check.wrapping_add(1);
        }
        ModeRegister::write(self, record);
    }
}

impl RtcMemory for DeviceState {
    fn rtc_read(&self, offset: usize) -> u8 {
        self.rtc[offset]
    }

    fn rtc_write(&mut self, offset: usize, value: u8) {
        self.rtc[offset] = value;
    }
}

/// `none | ota | companion | first-run | raw=N`
pub fn parse_mode(s: &str) -> Result<BootMode> {
    match s.to_ascii_lowercase().as_str() {
        "none" => Ok(BootMode::Unset),
        "ota" => Ok(BootMode::Ota),
        "companion" | "companion-app" => Ok(BootMode::CompanionApp),
        "first-run" => Ok(BootMode::FirstRun),
        other => other
            .strip_prefix("raw=")
            .and_then(|n| n.parse::<u8>().ok())
            .map(BootMode::from_tag)
            .ok_or_else(|| CliError::Mode(s.into())),
    }
}
