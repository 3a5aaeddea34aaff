use std::fmt;

/// A compile error attached to a source unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    /// File name of the unit, e.g. `Foo.java`
    pub unit: String,
    /// Fully qualified name of the unit's first top-level type, or the
    /// file name when the type is unknown
    pub display_name: String,
    pub line: i64,
    pub message: String,
}

impl ErrorEntry {
    /// Dedup identity: `unit:line -> message`
    pub fn key(&self) -> String {
        format!("{}:{} -> {}", self.unit, self.line, self.message)
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  (line {})\n  -> ERROR: {}",
            self.display_name, self.line, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_display() {
        let entry = ErrorEntry {
            unit: "Foo.java".to_string(),
            display_name: "com.example.Foo".to_string(),
            line: 7,
            message: "Syntax error".to_string(),
        };
        assert_eq!(entry.key(), "Foo.java:7 -> Syntax error");
        assert_eq!(
            entry.to_string(),
            "com.example.Foo  (line 7)\n  -> ERROR: Syntax error"
        );
    }
}
