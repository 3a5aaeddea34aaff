use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Java modifier bitset, using the same bit values as the JVM access flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const PUBLIC: Self = Self(0x0001);
    pub const PRIVATE: Self = Self(0x0002);
    pub const PROTECTED: Self = Self(0x0004);
    pub const STATIC: Self = Self(0x0008);
    pub const FINAL: Self = Self(0x0010);
    pub const SYNCHRONIZED: Self = Self(0x0020);
    pub const VOLATILE: Self = Self(0x0040);
    pub const TRANSIENT: Self = Self(0x0080);
    pub const NATIVE: Self = Self(0x0100);
    pub const ABSTRACT: Self = Self(0x0400);
    pub const STRICTFP: Self = Self(0x0800);

    /// Rendering order used by `java.lang.reflect.Modifier.toString`.
    const ORDER: [(Modifiers, &'static str); 11] = [
        (Self::PUBLIC, "public"),
        (Self::PROTECTED, "protected"),
        (Self::PRIVATE, "private"),
        (Self::ABSTRACT, "abstract"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::TRANSIENT, "transient"),
        (Self::VOLATILE, "volatile"),
        (Self::SYNCHRONIZED, "synchronized"),
        (Self::NATIVE, "native"),
        (Self::STRICTFP, "strictfp"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Only the access flags: `public`, `protected`, `private`
    pub const fn access(self) -> Self {
        Self(self.0 & (Self::PUBLIC.0 | Self::PROTECTED.0 | Self::PRIVATE.0))
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Parse a single modifier keyword. Annotations, `default`, `sealed`
    /// and `non-sealed` are not part of the bitset.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ORDER
            .iter()
            .find(|(_, name)| *name == keyword)
            .map(|(flag, _)| *flag)
    }

    /// Keywords present in this set, in canonical order
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        Self::ORDER
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl<'a> FromIterator<&'a str> for Modifiers {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter()
            .filter_map(Self::from_keyword)
            .fold(Self::empty(), |acc, m| acc | m)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for keyword in self.keywords() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let mods: Modifiers = ["final", "static", "public"].into_iter().collect();
        assert_eq!(mods.to_string(), "public static final");
    }

    #[test]
    fn test_abstract_before_static() {
        let mods = Modifiers::STATIC | Modifiers::ABSTRACT | Modifiers::PROTECTED;
        assert_eq!(mods.to_string(), "protected abstract static");
    }

    #[test]
    fn test_non_modifier_keywords_ignored() {
        let mods: Modifiers = ["default", "sealed", "@Override"].into_iter().collect();
        assert!(mods.is_empty());
        assert_eq!(mods.to_string(), "");
    }

    #[test]
    fn test_insert_remove() {
        let mut mods = Modifiers::PUBLIC | Modifiers::ABSTRACT;
        mods.remove(Modifiers::ABSTRACT);
        assert!(!mods.contains(Modifiers::ABSTRACT));
        mods.insert(Modifiers::STATIC);
        assert_eq!(mods.to_string(), "public static");
    }
}
