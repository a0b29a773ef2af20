use std::borrow::Cow;

/// Wildcard source rank. Negative, outside the rank enumeration space.
pub const ANY_SOURCE: i32 = -1;

/// Wildcard message tag. Negative, outside the tag space.
pub const ANY_TAG: i32 = -1;

/// Reserved root rank used by intercommunicator collectives.
pub const ROOT: i32 = -2;

/// Symbolic constant categories carried by call parameters.
///
/// Every category shares one rendered shape (`{"value": .., "label": ..}`);
/// the category only selects which name table resolves the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Comm,
    Datatype,
    Op,
    Group,
    File,
    Info,
    Keyval,
    CommKeyval,
    TypeKeyval,
    WinKeyval,
    Locktype,
    Errhandler,
    Filemode,
    Ordering,
    Threadlevel,
    Topology,
    Typeclass,
    Win,
    WinAssert,
    Comparison,
    Whence,
    Combiner,
}

/// Name resolution for symbolic constants, injected per formatting session.
///
/// Implementations are supplied by the symbol-table collaborator that
/// tracked handle creation while reading the trace. Resolution must be pure;
/// a resolver may return a placeholder for values it does not know.
pub trait SymbolTable {
    fn resolve(&self, category: Category, value: i32) -> Cow<'_, str>;
}

impl<F> SymbolTable for F
where
    F: Fn(Category, i32) -> String,
{
    fn resolve(&self, category: Category, value: i32) -> Cow<'_, str> {
        Cow::Owned(self(category, value))
    }
}

/// Resolver that knows no names. Every lookup yields `"unknown"`.
pub struct NoSymbols;

impl SymbolTable for NoSymbols {
    fn resolve(&self, _category: Category, _value: i32) -> Cow<'_, str> {
        Cow::Borrowed("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_symbols_placeholder() {
        assert_eq!(NoSymbols.resolve(Category::Comm, 2), "unknown");
        assert_eq!(NoSymbols.resolve(Category::Combiner, 0), "unknown");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |category: Category, value: i32| format!("{:?}:{}", category, value);
        assert_eq!(resolver.resolve(Category::Datatype, 7), "Datatype:7");
    }
}
