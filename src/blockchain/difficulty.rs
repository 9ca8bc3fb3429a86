use std::sync::atomic::{AtomicU32, Ordering};

use log::info;

use super::{DIFF_MAX, DIFF_MIN};
use crate::error::{LedgerError, Result};

/// Process-wide puzzle strength. Readers take one snapshot per search or
/// validation pass; writers are rare.
#[derive(Debug)]
pub struct Difficulty(AtomicU32);

impl Difficulty {
    pub fn new(initial: u32) -> Result<Self> {
        let value = Self::check(i64::from(initial))?;
        Ok(Self(AtomicU32::new(value)))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Replace the difficulty. Out-of-range values leave the old one in place.
    pub fn set(&self, value: i64) -> Result<u32> {
        let value = Self::check(value)?;
        let previous = self.0.swap(value, Ordering::AcqRel);
        info!("difficulty changed {previous} -> {value}");
        Ok(value)
    }

    fn check(value: i64) -> Result<u32> {
        if value < i64::from(DIFF_MIN) {
            return Err(LedgerError::Config(format!(
                "difficulty must be a positive integer, got {value}"
            )));
        }
        if value > i64::from(DIFF_MAX) {
            return Err(LedgerError::Config(format!(
                "difficulty {value} exceeds the {DIFF_MAX} hex digits of a digest"
            )));
        }
        Ok(value as u32)
    }
}
