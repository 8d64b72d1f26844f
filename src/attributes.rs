//! Combinable file attribute flags.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// A set of file attributes, using the host's numeric flag values.
///
/// `NORMAL` is only meaningful on its own: [`FileAttributes::normalized`] drops it as soon as any
/// other flag is present, and turns an empty set into `NORMAL`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FileAttributes(u32);

impl FileAttributes {
    pub const READ_ONLY: Self = Self(0x01);
    pub const HIDDEN: Self = Self(0x02);
    pub const SYSTEM: Self = Self(0x04);
    pub const DIRECTORY: Self = Self(0x10);
    pub const ARCHIVE: Self = Self(0x20);
    pub const NORMAL: Self = Self(0x80);

    const ALL: u32 = 0x01 | 0x02 | 0x04 | 0x10 | 0x20 | 0x80;

    const NAMES: [(Self, &'static str); 6] = [
        (Self::READ_ONLY, "ReadOnly"),
        (Self::HIDDEN, "Hidden"),
        (Self::SYSTEM, "System"),
        (Self::DIRECTORY, "Directory"),
        (Self::ARCHIVE, "Archive"),
        (Self::NORMAL, "Normal"),
    ];

    /// Builds a set from raw bits, ignoring unknown ones.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every flag of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Applies the host rule for `NORMAL`.
    pub fn normalized(self) -> Self {
        let rest = Self(self.0 & !Self::NORMAL.0);
        if rest.is_empty() { Self::NORMAL } else { rest }
    }
}

impl Default for FileAttributes {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl BitOr for FileAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FileAttributes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for FileAttributes {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL)
    }
}

impl fmt::Display for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            return f.write_str("None");
        }
        f.write_str(&names.join(", "))
    }
}

impl fmt::Debug for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileAttributes({self})")
    }
}
