//! The fixed weekly grid: five weekdays by four evening time-bands.
//!
//! Every room and every cohort has the same 20 addressable positions per
//! week. Cells are numbered row-major by day: `cell = day * SLOTS + slot`.

/// Number of teaching days in a week.
pub const DAYS: usize = 5;

/// Number of time-bands per day.
pub const SLOTS: usize = 4;

/// Number of addressable (day, slot) cells in one week.
pub const CELLS: usize = DAYS * SLOTS;

/// A teaching weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; DAYS] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Zero-based position in the week.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day at a zero-based position, if in range.
    pub fn from_index(index: usize) -> Option<Day> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

/// An evening time-band.
///
/// Bands are contiguous: `First` is followed directly by `Second`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    /// 18:50
    First,
    /// 19:40
    Second,
    /// 20:30
    Third,
    /// 21:20
    Fourth,
}

impl Slot {
    /// All slots in time order.
    pub const ALL: [Slot; SLOTS] = [Slot::First, Slot::Second, Slot::Third, Slot::Fourth];

    /// Zero-based position in the evening.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Slot at a zero-based position, if in range.
    pub fn from_index(index: usize) -> Option<Slot> {
        Self::ALL.get(index).copied()
    }

    /// Start time of the band.
    pub fn label(self) -> &'static str {
        match self {
            Slot::First => "18:50",
            Slot::Second => "19:40",
            Slot::Third => "20:30",
            Slot::Fourth => "21:20",
        }
    }

    /// Parses a start-time label such as `"19:40"`.
    pub fn from_label(label: &str) -> Option<Slot> {
        Self::ALL.iter().copied().find(|s| s.label() == label.trim())
    }
}

/// Row-major cell index of a (day, slot) pair.
pub fn cell_index(day: Day, slot: Slot) -> usize {
    day.index() * SLOTS + slot.index()
}

/// Inverse of [`cell_index`].
///
/// # Panics
/// Panics if `cell >= CELLS`.
pub fn cell_position(cell: usize) -> (Day, Slot) {
    assert!(cell < CELLS, "cell index {cell} out of range");
    (Day::ALL[cell / SLOTS], Slot::ALL[cell % SLOTS])
}
