//! Line-oriented text rendering of profiled call-trace records.
//!
//! Each traced call becomes one JSON-like record on its own line:
//!
//! ```text
//! {"event": "MPI_Send", "walltime": 1.000000005, "cputime": 2.000000010, "thread": 0,
//!  "count": 4, "datatype": {"value": 3, "label": "MPI_INT"}, "dest": 1, "tag": 7,
//!  "comm": {"value": 2, "label": "MPI_COMM_WORLD"},
//!  "walltime": 1.000000900, "cputime": 2.000001000, "thread": 0}
//! ```
//!
//! The timing/thread keys repeat once for call entry and once for call exit;
//! consumers must treat them as two sequential snapshots. Output is
//! whitespace-insensitive and each record is terminated by a newline.
//!
//! Absent or non-instrumented data renders as the literal `null` by policy;
//! it is never an error. The only failure path is the underlying stream.

use callrec::{
    AddressTable, CallSpan, Category, Clock, Request, Status, StrArray, StrCube, StrMatrix,
    SymbolTable, ANY_SOURCE, ANY_TAG, ROOT,
};
use std::fmt::Display;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    FieldsOpen,
}

#[derive(Debug, Clone, Copy)]
enum Section {
    Entering,
    Returning,
}

/// Streaming writer for call-trace text records.
///
/// Bundles the output stream, the injected symbolic-constant resolver and
/// the session function-address table; nothing else is consulted while
/// formatting. One record is emitted per [`begin_record`]/[`end_record`]
/// pair, with one field-encoder call per parameter in between, in the
/// call's declared parameter order.
///
/// [`begin_record`]: AsciiStreamWriter::begin_record
/// [`end_record`]: AsciiStreamWriter::end_record
pub struct AsciiStreamWriter<'a, W: Write> {
    writer: W,
    symbols: &'a dyn SymbolTable,
    functions: &'a AddressTable,
    state: State,
}

impl<'a, W: Write> AsciiStreamWriter<'a, W> {
    pub fn new(writer: W, symbols: &'a dyn SymbolTable, functions: &'a AddressTable) -> Self {
        Self {
            writer,
            symbols,
            functions,
            state: State::Idle,
        }
    }

    /// Opens a record: call name plus the entry timing/thread/counter block.
    pub fn begin_record(&mut self, name: &str, span: &CallSpan) -> Result<(), FormatError> {
        debug_assert_eq!(self.state, State::Idle, "previous record still open");
        write!(self.writer, "{{\"event\": \"{}\", ", name)?;
        self.stats(span, Section::Entering)?;
        self.state = State::FieldsOpen;
        Ok(())
    }

    /// Closes the record with the exit timing/thread/counter block and the
    /// record separator. The returned flag tells the driving reader to
    /// continue; it is always `true`.
    pub fn end_record(&mut self, span: &CallSpan) -> Result<bool, FormatError> {
        debug_assert_eq!(self.state, State::FieldsOpen, "no record open");
        self.writer.write_all(b", ")?;
        self.stats(span, Section::Returning)?;
        self.writer.write_all(b"}\n")?;
        self.state = State::Idle;
        Ok(true)
    }

    pub fn int(&mut self, key: &str, value: i32) -> Result<(), FormatError> {
        self.key(key)?;
        write!(self.writer, "{}", value)?;
        Ok(())
    }

    pub fn int64(&mut self, key: &str, value: i64) -> Result<(), FormatError> {
        self.key(key)?;
        write!(self.writer, "{}", value)?;
        Ok(())
    }

    pub fn string(&mut self, key: &str, value: Option<&str>) -> Result<(), FormatError> {
        self.key(key)?;
        match value {
            Some(s) => write!(self.writer, "\"{}\"", s)?,
            None => self.writer.write_all(b"null")?,
        }
        Ok(())
    }

    /// Integer sequence with an explicit count. Absent data or a count below
    /// 1 renders `null`, not an empty sequence.
    pub fn int_array(
        &mut self,
        key: &str,
        values: Option<&[i32]>,
        count: i32,
    ) -> Result<(), FormatError> {
        self.key(key)?;
        match values {
            Some(values) if count >= 1 => {
                self.writer.write_all(b"[")?;
                for (i, v) in values.iter().take(count as usize).enumerate() {
                    if i > 0 {
                        self.writer.write_all(b", ")?;
                    }
                    write!(self.writer, "{}", v)?;
                }
                self.writer.write_all(b"]")?;
            }
            _ => self.writer.write_all(b"null")?,
        }
        Ok(())
    }

    /// Rectangular integer matrix. Absent data or fewer than 1 row renders
    /// `null`; a non-positive column count yields empty rows.
    pub fn int_array_2d(
        &mut self,
        key: &str,
        values: Option<&[Vec<i32>]>,
        rows: i32,
        cols: i32,
    ) -> Result<(), FormatError> {
        self.key(key)?;
        match values {
            Some(values) if rows >= 1 => {
                self.writer.write_all(b"[")?;
                for (i, row) in values.iter().take(rows as usize).enumerate() {
                    if i > 0 {
                        self.writer.write_all(b", ")?;
                    }
                    self.writer.write_all(b"[")?;
                    for (j, v) in row.iter().take(cols.max(0) as usize).enumerate() {
                        if j > 0 {
                            self.writer.write_all(b", ")?;
                        }
                        write!(self.writer, "{}", v)?;
                    }
                    self.writer.write_all(b"]")?;
                }
                self.writer.write_all(b"]")?;
            }
            _ => self.writer.write_all(b"null")?,
        }
        Ok(())
    }

    /// String sequence whose length kind is carried by the value itself.
    /// The NUL-terminated sentinel degenerates to a single quoted scalar.
    pub fn string_array(&mut self, key: &str, value: &StrArray) -> Result<(), FormatError> {
        self.key(key)?;
        self.str_array_value(value)
    }

    /// Jagged string matrix; the outer dimension and every row resolve
    /// their lengths independently.
    pub fn string_matrix(&mut self, key: &str, value: &StrMatrix) -> Result<(), FormatError> {
        self.key(key)?;
        self.str_matrix_value(value)
    }

    /// Three-level string data; same rules applied per level.
    pub fn string_cube(&mut self, key: &str, value: &StrCube) -> Result<(), FormatError> {
        self.key(key)?;
        match value {
            StrCube::Absent => self.writer.write_all(b"null")?,
            StrCube::Counted(planes, count) if *count >= 1 => {
                self.str_cube_planes(planes.iter().take(*count as usize).map(|p| p.as_ref()))?;
            }
            StrCube::Counted(..) => self.writer.write_all(b"null")?,
            StrCube::NullTerm(planes) => {
                self.str_cube_planes(planes.iter().map_while(|p| p.as_ref()).map(Some))?;
            }
        }
        Ok(())
    }

    /// Single status descriptor; an absent descriptor renders `null`.
    pub fn status(&mut self, key: &str, value: Option<&Status>) -> Result<(), FormatError> {
        self.status_array(key, value.map(std::slice::from_ref), 1)
    }

    /// Status descriptor sequence. Absent data or a count below 1 means the
    /// statuses were ignored and renders `null`.
    pub fn status_array(
        &mut self,
        key: &str,
        values: Option<&[Status]>,
        count: i32,
    ) -> Result<(), FormatError> {
        self.key(key)?;
        match values {
            Some(values) if count >= 1 => {
                self.writer.write_all(b"[")?;
                for (i, s) in values.iter().take(count as usize).enumerate() {
                    if i > 0 {
                        self.writer.write_all(b", ")?;
                    }
                    write!(
                        self.writer,
                        "{{\"bytes\":{}, \"cancelled\":{}, \"source\":{}, \"tag\":{}, \"error\":{}}}",
                        s.bytes, s.cancelled, s.source, s.tag, s.error
                    )?;
                }
                self.writer.write_all(b"]")?;
            }
            _ => self.writer.write_all(b"null")?,
        }
        Ok(())
    }

    /// Single request handle, rendered as a one-element sequence.
    pub fn request(&mut self, key: &str, value: Request) -> Result<(), FormatError> {
        self.request_array(key, Some(std::slice::from_ref(&value)), 1)
    }

    /// Request handle sequence. Absent data or a negative count renders
    /// `null`; a count of exactly 0 is a valid empty sequence `[]`. The
    /// threshold intentionally differs from status arrays.
    pub fn request_array(
        &mut self,
        key: &str,
        values: Option<&[Request]>,
        count: i32,
    ) -> Result<(), FormatError> {
        self.key(key)?;
        match values {
            Some(values) if count >= 0 => {
                self.writer.write_all(b"[")?;
                for (i, r) in values.iter().take(count as usize).enumerate() {
                    if i > 0 {
                        self.writer.write_all(b", ")?;
                    }
                    write!(self.writer, "{}", r.0)?;
                }
                self.writer.write_all(b"]")?;
            }
            _ => self.writer.write_all(b"null")?,
        }
        Ok(())
    }

    /// Symbolic constant: `{"value": <int>, "label": "<name>"}` with the
    /// label resolved by the session resolver for the given category.
    pub fn labeled(&mut self, key: &str, category: Category, value: i32) -> Result<(), FormatError> {
        self.key(key)?;
        let symbols = self.symbols;
        let label = symbols.resolve(category, value);
        self.pair(value, Some(&label))
    }

    /// Source rank. The wildcard and root ranks are negative reserved values
    /// that must not reach a category resolver; they render as pairs with
    /// their fixed labels, everything else as a plain integer.
    pub fn source(&mut self, key: &str, value: i32) -> Result<(), FormatError> {
        self.rank(key, value)
    }

    /// Destination rank; same reserved-value handling as [`source`].
    ///
    /// [`source`]: AsciiStreamWriter::source
    pub fn dest(&mut self, key: &str, value: i32) -> Result<(), FormatError> {
        self.rank(key, value)
    }

    /// Message tag. The wildcard tag renders as the bare token
    /// `MPI_ANY_TAG`, everything else as a plain integer.
    pub fn tag(&mut self, key: &str, value: i32) -> Result<(), FormatError> {
        if value == ANY_TAG {
            self.key(key)?;
            self.writer.write_all(b"MPI_ANY_TAG")?;
            Ok(())
        } else {
            self.int(key, value)
        }
    }

    /// Recorded callback address, resolved against the session address
    /// table. An unmatched address keeps its numeric value with a `null`
    /// label.
    pub fn func(&mut self, key: &str, address: u64) -> Result<(), FormatError> {
        self.key(key)?;
        let functions = self.functions;
        let name = functions.resolve(address);
        if name.is_none() {
            tracing::debug!(address, "no symbol for function address");
        }
        self.pair(address, name)
    }

    pub fn flush(&mut self) -> Result<(), FormatError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn rank(&mut self, key: &str, value: i32) -> Result<(), FormatError> {
        match value {
            ANY_SOURCE => {
                self.key(key)?;
                self.pair(value, Some("MPI_ANY_SOURCE"))
            }
            ROOT => {
                self.key(key)?;
                self.pair(value, Some("MPI_ROOT"))
            }
            _ => self.int(key, value),
        }
    }

    fn key(&mut self, key: &str) -> Result<(), FormatError> {
        debug_assert_eq!(self.state, State::FieldsOpen, "field outside record");
        write!(self.writer, ", \"{}\": ", key)?;
        Ok(())
    }

    fn pair(&mut self, value: impl Display, label: Option<&str>) -> Result<(), FormatError> {
        match label {
            Some(label) => write!(self.writer, "{{\"value\": {}, \"label\": \"{}\"}}", value, label)?,
            None => write!(self.writer, "{{\"value\": {}, \"label\": null}}", value)?,
        }
        Ok(())
    }

    fn clock(&mut self, clock: Clock) -> Result<(), FormatError> {
        write!(self.writer, "{}.{:09}", clock.sec, clock.nsec)?;
        Ok(())
    }

    fn stats(&mut self, span: &CallSpan, section: Section) -> Result<(), FormatError> {
        let (wall, cpu) = match section {
            Section::Entering => (span.wall.start, span.cpu.start),
            Section::Returning => (span.wall.stop, span.cpu.stop),
        };
        self.writer.write_all(b"\"walltime\": ")?;
        self.clock(wall)?;
        self.writer.write_all(b", \"cputime\": ")?;
        self.clock(cpu)?;
        write!(self.writer, ", \"thread\": {}", span.thread)?;

        let counters = match span.perf.as_ref() {
            Some(perf) if !perf.counters.is_empty() => &perf.counters,
            _ => return Ok(()),
        };
        self.writer.write_all(b", \"perfcounters\": [")?;
        for (i, counter) in counters.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b", ")?;
            }
            let value = match section {
                Section::Entering => counter.invalue,
                Section::Returning => counter.outvalue,
            };
            write!(self.writer, "{}={}", counter.tag, value)?;
        }
        self.writer.write_all(b"]")?;
        Ok(())
    }

    fn str_array_value(&mut self, value: &StrArray) -> Result<(), FormatError> {
        match value {
            StrArray::Absent => self.writer.write_all(b"null")?,
            StrArray::CStr(s) => write!(self.writer, "\"{}\"", s)?,
            StrArray::Counted(items, count) if *count >= 1 => {
                self.str_items(items.iter().take(*count as usize).map(|i| i.as_deref()))?;
            }
            StrArray::Counted(..) => self.writer.write_all(b"null")?,
            StrArray::NullTerm(items) => {
                self.str_items(items.iter().map_while(|i| i.as_deref()).map(Some))?;
            }
        }
        Ok(())
    }

    fn str_items<'i>(
        &mut self,
        items: impl Iterator<Item = Option<&'i str>>,
    ) -> Result<(), FormatError> {
        self.writer.write_all(b"[")?;
        for (i, item) in items.enumerate() {
            if i > 0 {
                self.writer.write_all(b", ")?;
            }
            match item {
                Some(s) => write!(self.writer, "\"{}\"", s)?,
                None => self.writer.write_all(b"null")?,
            }
        }
        self.writer.write_all(b"]")?;
        Ok(())
    }

    fn str_matrix_value(&mut self, value: &StrMatrix) -> Result<(), FormatError> {
        match value {
            StrMatrix::Absent => self.writer.write_all(b"null")?,
            StrMatrix::Counted(rows, count) if *count >= 1 => {
                self.str_matrix_rows(rows.iter().take(*count as usize).map(|r| r.as_ref()))?;
            }
            StrMatrix::Counted(..) => self.writer.write_all(b"null")?,
            StrMatrix::NullTerm(rows) => {
                self.str_matrix_rows(rows.iter().map_while(|r| r.as_ref()).map(Some))?;
            }
        }
        Ok(())
    }

    fn str_matrix_rows<'i>(
        &mut self,
        rows: impl Iterator<Item = Option<&'i StrArray>>,
    ) -> Result<(), FormatError> {
        self.writer.write_all(b"[")?;
        for (i, row) in rows.enumerate() {
            if i > 0 {
                self.writer.write_all(b", ")?;
            }
            match row {
                Some(row) => self.str_array_value(row)?,
                None => self.writer.write_all(b"null")?,
            }
        }
        self.writer.write_all(b"]")?;
        Ok(())
    }

    fn str_cube_planes<'i>(
        &mut self,
        planes: impl Iterator<Item = Option<&'i StrMatrix>>,
    ) -> Result<(), FormatError> {
        self.writer.write_all(b"[")?;
        for (i, plane) in planes.enumerate() {
            if i > 0 {
                self.writer.write_all(b", ")?;
            }
            match plane {
                Some(plane) => self.str_matrix_value(plane)?,
                None => self.writer.write_all(b"null")?,
            }
        }
        self.writer.write_all(b"]")?;
        Ok(())
    }
}
