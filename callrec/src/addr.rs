use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddressTableError {
    #[error("malformed address entry at line {line}: {text}")]
    Malformed { line: usize, text: String },

    #[error("invalid address at line {line}: {source}")]
    BadAddress {
        line: usize,
        source: std::num::ParseIntError,
    },
}

/// Maps recorded function-pointer values to symbolic names.
///
/// Supplied once per formatting session and referenced read-only by the
/// writer. Tables are expected to hold tens of entries, so resolution is an
/// exact-match linear scan.
#[derive(Debug, Default)]
pub struct AddressTable {
    entries: Vec<(u64, String)>,
}

impl AddressTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, address: u64, name: impl Into<String>) {
        self.entries.push((address, name.into()));
    }

    /// Parses a plain-text address listing: one `<address> <name>` pair per
    /// line, addresses in hex (`0x` prefix) or decimal. Blank lines and `#`
    /// comments are skipped.
    pub fn parse(text: &str) -> Result<Self, AddressTableError> {
        let mut table = Self::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (addr, name) =
                trimmed
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| AddressTableError::Malformed {
                        line,
                        text: trimmed.to_string(),
                    })?;
            let address = match addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => addr.parse::<u64>(),
            }
            .map_err(|source| AddressTableError::BadAddress { line, source })?;
            table.push(address, name.trim());
        }
        Ok(table)
    }

    /// Exact-match lookup. No partial or prefix matching.
    pub fn resolve(&self, address: u64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(addr, _)| *addr == address)
            .map(|(_, name)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_match() {
        let mut table = AddressTable::new();
        table.push(0x1000, "init_handler");
        table.push(0x2000, "comm_errhandler");
        table.push(0x3000, "win_errhandler");

        assert_eq!(table.resolve(0x3000), Some("win_errhandler"));
        assert_eq!(table.resolve(0x2000), Some("comm_errhandler"));
        assert_eq!(table.resolve(0x2001), None);
    }

    #[test]
    fn test_parse_listing() {
        let table = AddressTable::parse(
            "# callback addresses\n\
             0x1000 init_handler\n\
             \n\
             8192 comm_errhandler\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(0x1000), Some("init_handler"));
        assert_eq!(table.resolve(8192), Some("comm_errhandler"));
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let err = AddressTable::parse("0x1000 ok\nnot-an-entry\n").unwrap_err();
        match err {
            AddressTableError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }

        let err = AddressTable::parse("0xzz broken\n").unwrap_err();
        match err {
            AddressTableError::BadAddress { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_table() {
        let table = AddressTable::new();
        assert!(table.is_empty());
        assert_eq!(table.resolve(0), None);
    }
}
