//! Data model for profiled call-trace records.
//!
//! A trace reader decodes one call event at a time into the types defined
//! here: a [`CallSpan`] carrying the timing/thread/perf-counter snapshots,
//! plus the call's parameters (scalars, arrays, status descriptors, request
//! handles, symbolic constants). The `ascii-format` crate renders these into
//! line-oriented text records.

mod addr;
mod len;
mod record;
mod symbols;

pub use addr::{AddressTable, AddressTableError};
pub use len::{Len, CSTRING, NULLTERM};
pub use record::{
    CallSpan, Clock, PerfCounter, PerfInfo, Request, Status, StrArray, StrCube, StrMatrix,
    TimeInterval,
};
pub use symbols::{Category, NoSymbols, SymbolTable, ANY_SOURCE, ANY_TAG, ROOT};
