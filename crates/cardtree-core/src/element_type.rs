//! Element categories as capability flags.
//!
//! A node's own type is a single flag; slots accept unions, so "accepts any of
//! {X, Y}" is a bit test.

use std::fmt;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
    pub struct ElementType: u32 {
        const COMMAND = 1 << 0;
        const CONDITION = 1 << 1;
        const ACTION = 1 << 2;
        const SELECTOR = 1 << 3;
        const SET = 1 << 4;
        const FILTER = 1 << 5;
        const GROUP_SIZE = 1 << 6;
        const SUPERLATIVE = 1 << 7;
        const LOCATION = 1 << 8;
        const POINT = 1 << 9;
        const LINE = 1 << 10;
        const AREA = 1 << 11;
        const DIRECTION = 1 << 12;
        const UNIT_TYPE = 1 << 13;
        const ATTRIBUTE_TYPE = 1 << 14;
        const ABILITY_TYPE = 1 << 15;
        const RESOURCE_TYPE = 1 << 16;
        const NUMBER = 1 << 17;
    }
}

/// Names as written in declaration sources and printed output.
const NAMES: &[(&str, ElementType)] = &[
    ("Command", ElementType::COMMAND),
    ("Condition", ElementType::CONDITION),
    ("Action", ElementType::ACTION),
    ("Selector", ElementType::SELECTOR),
    ("Set", ElementType::SET),
    ("Filter", ElementType::FILTER),
    ("Group_Size", ElementType::GROUP_SIZE),
    ("Superlative", ElementType::SUPERLATIVE),
    ("Location", ElementType::LOCATION),
    ("Point", ElementType::POINT),
    ("Line", ElementType::LINE),
    ("Area", ElementType::AREA),
    ("Direction", ElementType::DIRECTION),
    ("Unit_Type", ElementType::UNIT_TYPE),
    ("Attribute_Type", ElementType::ATTRIBUTE_TYPE),
    ("Ability_Type", ElementType::ABILITY_TYPE),
    ("Resource_Type", ElementType::RESOURCE_TYPE),
    ("Number", ElementType::NUMBER),
];

/// Spelling of the union of every category.
pub(crate) const ANY_NAME: &str = "Any";

impl ElementType {
    /// Parse a source-level type name (`Group_Size`, `Number`, `Any`).
    pub fn parse(name: &str) -> Option<Self> {
        if name == ANY_NAME {
            return Some(Self::all());
        }
        NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, flag)| *flag)
    }

    /// Source-level name of a single flag.
    pub fn name(self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(_, flag)| *flag == self)
            .map(|(n, _)| *n)
    }

    /// True when exactly one category is set.
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Nothing");
        }
        if *self == Self::all() {
            return write!(f, "{ANY_NAME}");
        }
        for (i, flag) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", flag.name().unwrap_or("?"))?;
        }
        Ok(())
    }
}
