use crate::Len;

/// Wall-clock or CPU-clock timestamp split into seconds and nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    pub sec: i32,
    pub nsec: i32,
}

impl Clock {
    pub fn new(sec: i32, nsec: i32) -> Self {
        Clock { sec, nsec }
    }
}

/// Entry and exit timestamps of a traced call on one clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeInterval {
    pub start: Clock,
    pub stop: Clock,
}

/// Timing, thread identity and optional perf-counter snapshot of one call.
///
/// The same span is read twice while a record is emitted: the record opener
/// takes the start timestamps and counter entry values, the record closer
/// takes the stop timestamps and counter exit values.
#[derive(Debug, Clone, Default)]
pub struct CallSpan {
    pub thread: i32,
    pub wall: TimeInterval,
    pub cpu: TimeInterval,
    pub perf: Option<PerfInfo>,
}

/// One hardware/software counter sampled at call entry and exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfCounter {
    pub tag: String,
    pub invalue: i64,
    pub outvalue: i64,
}

/// Counter snapshot attached to a call span.
///
/// An empty counter list means no counters were configured and suppresses
/// the counters section of the record entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerfInfo {
    pub counters: Vec<PerfCounter>,
}

/// Opaque request handle recorded for asynchronous operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request(pub i32);

/// Completion status descriptor for a receive or wait operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    pub bytes: i32,
    pub cancelled: i32,
    pub source: i32,
    pub tag: i32,
    pub error: i32,
}

/// One dimension of string data together with its declared length kind.
///
/// Elements are optional because a NULL-terminated sequence is delimited by
/// its first absent element; an absent element inside a counted sequence
/// simply renders as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrArray {
    /// The traced call did not supply the data at all.
    Absent,
    /// NUL-terminated sentinel: the value is a single string scalar.
    CStr(String),
    /// Explicit element count; counts below 1 render as `null`.
    Counted(Vec<Option<String>>, i32),
    /// The sequence ends at the first absent element.
    NullTerm(Vec<Option<String>>),
}

impl StrArray {
    /// Builds a string collection from decoded elements and the length the
    /// trace recorded for them. A `CStr` length takes the first present
    /// element as the scalar; with none, the collection is absent.
    pub fn from_len(items: Vec<Option<String>>, len: Len) -> StrArray {
        match len {
            Len::CStr => items
                .into_iter()
                .flatten()
                .next()
                .map_or(StrArray::Absent, StrArray::CStr),
            Len::Counted(count) => StrArray::Counted(items, count),
            Len::NullTerm => StrArray::NullTerm(items),
        }
    }
}

/// Two-dimensional string data where every row carries its own length kind.
///
/// The outer dimension and each row are length-resolved independently: a
/// counted outer dimension may hold a NULL-terminated row and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrMatrix {
    Absent,
    Counted(Vec<Option<StrArray>>, i32),
    NullTerm(Vec<Option<StrArray>>),
}

impl StrMatrix {
    /// Builds the outer dimension from decoded rows and its recorded
    /// length. A `CStr` outer length is not representable in the trace and
    /// maps to an absent matrix.
    pub fn from_len(rows: Vec<Option<StrArray>>, len: Len) -> StrMatrix {
        match len {
            Len::CStr => StrMatrix::Absent,
            Len::Counted(count) => StrMatrix::Counted(rows, count),
            Len::NullTerm => StrMatrix::NullTerm(rows),
        }
    }
}

/// Three-dimensional string data; every level resolves its own length kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrCube {
    Absent,
    Counted(Vec<Option<StrMatrix>>, i32),
    NullTerm(Vec<Option<StrMatrix>>),
}

impl StrCube {
    /// Builds the outermost dimension from decoded planes and its recorded
    /// length; same rules as [`StrMatrix::from_len`].
    pub fn from_len(planes: Vec<Option<StrMatrix>>, len: Len) -> StrCube {
        match len {
            Len::CStr => StrCube::Absent,
            Len::Counted(count) => StrCube::Counted(planes, count),
            Len::NullTerm => StrCube::NullTerm(planes),
        }
    }
}
