/// Reserved length value marking a NUL-terminated string.
pub const CSTRING: i32 = -1;

/// Reserved length value marking a NULL-terminated pointer array.
pub const NULLTERM: i32 = -2;

/// Length of a collection parameter as recorded in the trace.
///
/// Trace events either carry an explicit element count or one of two
/// reserved sentinels, depending on whether the traced call supplied a
/// count. The sentinels are kept out of the count space here so encoders
/// never have to compare against magic negative numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Len {
    /// Explicit element count. Counts below 1 mean the collection was not
    /// instrumented and renders as `null`.
    Counted(i32),
    /// The value is a single NUL-terminated string, not a sequence.
    CStr,
    /// The sequence ends at the first absent element.
    NullTerm,
}

impl Len {
    /// Decodes a raw length from the trace wire representation.
    ///
    /// Unrecognized negative values fall through to `Counted`, where they
    /// render as `null` like any other non-positive count.
    pub fn from_raw(len: i32) -> Len {
        match len {
            CSTRING => Len::CStr,
            NULLTERM => Len::NullTerm,
            n => Len::Counted(n),
        }
    }

    /// The wire representation of this length.
    pub fn raw(self) -> i32 {
        match self {
            Len::Counted(n) => n,
            Len::CStr => CSTRING,
            Len::NullTerm => NULLTERM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Len::Counted(0))]
    #[case(4, Len::Counted(4))]
    #[case(CSTRING, Len::CStr)]
    #[case(NULLTERM, Len::NullTerm)]
    #[case(-3, Len::Counted(-3))]
    fn test_from_raw(#[case] raw: i32, #[case] expected: Len) {
        assert_eq!(Len::from_raw(raw), expected);
        assert_eq!(expected.raw(), raw);
    }
}
