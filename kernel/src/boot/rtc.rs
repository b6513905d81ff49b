//! Badge Persistent Mode Register
//!
//! Two bytes of battery-backed RTC memory survive reset and deep sleep:
//! byte 0 holds the mode tag, byte 1 its bitwise complement. The pair is a
//! corruption / uninitialized-memory guard, not an authenticity check.
//!
//! The boot core only reads the register. Other firmware parts (OTA trigger,
//! companion-app exit, first-run flow) arm it through [`ModeRegister::arm`]
//! before they reset the device.

use core::fmt;

use crate::config::{RTC_CHECK_OFFSET, RTC_MODE_OFFSET};
use crate::hal::RtcMemory;

/// Decoded mode tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    Unset,
    Ota,
    CompanionApp,
    FirstRun,
    Unknown(u8),
}

impl BootMode {
    pub const fn from_tag(tag: u8) -> Self {
        match tag {
            0 => BootMode::Unset,
            1 => BootMode::Ota,
            2 => BootMode::CompanionApp,
            3 => BootMode::FirstRun,
            other => BootMode::Unknown(other),
        }
    }

    pub const fn tag(self) -> u8 {
        match self {
            BootMode::Unset => 0,
            BootMode::Ota => 1,
            BootMode::CompanionApp => 2,
            BootMode::FirstRun => 3,
            BootMode::Unknown(t) => t,
        }
    }
}

impl fmt::Display for BootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootMode::Unset => f.write_str("none"),
            BootMode::Ota => f.write_str("ota"),
            BootMode::CompanionApp => f.write_str("companion-app"),
            BootMode::FirstRun => f.write_str("first-run"),
            BootMode::Unknown(t) => write!(f, "unknown({})", t),
        }
    }
}

/// Raw register contents as read at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRecord {
    pub tag: u8,
    pub check: u8,
}

impl ModeRecord {
    pub const fn new(tag: u8, check: u8) -> Self {
        Self { tag, check }
    }

    /// Well-formed record for `mode`.
    pub const fn sealed(mode: BootMode) -> Self {
        let tag = mode.tag();
        Self { tag, check: !tag }
    }

    /// Trusted only when the second byte is the complement of the first.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.check == !self.tag
    }

    /// The mode, if the record can be trusted.
    pub const fn mode(&self) -> Option<BootMode> {
        if self.is_valid() {
            Some(BootMode::from_tag(self.tag))
        } else {
            None
        }
    }
}

/// Accessor over the two RTC bytes.
pub struct ModeRegister;

impl ModeRegister {
    /// Read both bytes. Completes before any dispatch decision is made.
    pub fn read<R: RtcMemory + ?Sized>(rtc: &R) -> ModeRecord {
        ModeRecord {
            tag: rtc.rtc_read(RTC_MODE_OFFSET),
            check: rtc.rtc_read(RTC_CHECK_OFFSET),
        }
    }

    /// Write a sealed record for `mode`; must happen before the reset that consumes it.
    pub fn arm<R: RtcMemory + ?Sized>(rtc: &mut R, mode: BootMode) {
        Self::write(rtc, ModeRecord::sealed(mode));
    }

    pub fn write<R: RtcMemory + ?Sized>(rtc: &mut R, record: ModeRecord) {
        rtc.rtc_write(RTC_MODE_OFFSET, record.tag);
        rtc.rtc_write(RTC_CHECK_OFFSET, record.check);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bytes([u8; 8]);

    impl RtcMemory for Bytes {
        fn rtc_read(&self, offset: usize) -> u8 {
            self.0[offset]
        }

        fn rtc_write(&mut self, offset: usize, value: u8) {
            self.0[offset] = value;
        }
    }

    #[test]
    fn valid_iff_check_is_complement() {
        for tag in 0..=255u8 {
            for check in 0..=255u8 {
                let rec = ModeRecord::new(tag, check);
                assert_eq!(rec.is_valid(), check == !tag, "tag={tag:#04x} check={check:#04x}");
            }
        }
    }

    #[test]
    fn zeroed_memory_is_invalid() {
        let rtc = Bytes([0; 8]);
        let rec = ModeRegister::read(&rtc);
        assert!(!rec.is_valid());
        assert_eq!(rec.mode(), None);
    }

    #[test]
    fn arm_writes_tag_and_complement_at_fixed_offsets() {
        let mut rtc = Bytes([0xAA; 8]);
        ModeRegister::arm(&mut rtc, BootMode::CompanionApp);
        assert_eq!(&rtc.0[..3], &[0x02, 0xFD, 0xAA]);
        assert_eq!(ModeRegister::read(&rtc).mode(), Some(BootMode::CompanionApp));
    }

    #[test]
    fn unknown_tags_survive_decode() {
        let rec = ModeRecord::sealed(BootMode::Unknown(0x42));
        assert_eq!(rec.mode(), Some(BootMode::Unknown(0x42)));
        assert_eq!(BootMode::from_tag(7).to_string(), "unknown(7)");
    }
}
