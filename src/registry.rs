use core::fmt;

use heapless::Vec;

use crate::command::network_service::types::OperatorStatus;
use crate::config::MAX_PLMN_LIST_CNT;

/// Numeric PLMN identity, the MCC digits followed by the MNC digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlmnId(u32);

impl PlmnId {
    /// Largest identity that fits the 24 bits reserved for it.
    pub const MAX: u32 = 0x00FF_FFFF;

    pub const fn new(id: u32) -> Option<Self> {
        if id > Self::MAX {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Parses the unquoted decimal digits of a numeric `<oper>`.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(digits.parse().ok()?)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlmnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the operator list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatorRecord {
    pub status: OperatorStatus,
    pub plmn: PlmnId,
}

/// Operators found by one scan, in the order the modem reported them.
///
/// Holds at most `N` records. Records added to a full registry are dropped and
/// counted, see [`PlmnRegistry::suppressed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlmnRegistry<const N: usize = MAX_PLMN_LIST_CNT> {
    records: Vec<OperatorRecord, N>,
    suppressed: usize,
}

impl<const N: usize> PlmnRegistry<N> {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            suppressed: 0,
        }
    }

    /// Appends `record`, returns `false` if the registry is full.
    pub fn add(&mut self, record: OperatorRecord) -> bool {
        if self.records.push(record).is_err() {
            self.suppressed += 1;
            return false;
        }
        true
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.suppressed = 0;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.is_full()
    }

    /// Number of records dropped since the last [`clear`](Self::clear).
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn iter(&self) -> core::slice::Iter<'_, OperatorRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[OperatorRecord] {
        &self.records
    }
}

impl<const N: usize> Default for PlmnRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> IntoIterator for &'a PlmnRegistry<N> {
    type Item = &'a OperatorRecord;
    type IntoIter = core::slice::Iter<'a, OperatorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
