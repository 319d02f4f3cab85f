//! Source line-range tags.

use std::fmt;

/// An inclusive range of 1-indexed source lines.
///
/// Attached to method declarations, method bodies and individual statements
/// when the program model was built with debug information.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineRange {
    /// First covered line
    pub start: u32,
    /// Last covered line (inclusive)
    pub end: u32,
}

impl LineRange {
    /// Create a new range. `start` and `end` are swapped if given backwards.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// A range covering a single line.
    #[inline]
    pub const fn line(line: u32) -> Self {
        Self { start: line, end: line }
    }

    /// Check whether `line` falls inside this range.
    #[inline]
    pub const fn contains(self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

impl fmt::Debug for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "line {}", self.start)
        } else {
            write!(f, "lines {}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let range = LineRange::new(10, 14);

        assert!(range.contains(10));
        assert!(range.contains(12));
        assert!(range.contains(14));
        assert!(!range.contains(9));
        assert!(!range.contains(15));
    }

    #[test]
    fn test_reversed_bounds() {
        assert_eq!(LineRange::new(8, 5), LineRange::new(5, 8));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", LineRange::line(7)), "line 7");
        assert_eq!(format!("{}", LineRange::new(5, 8)), "lines 5-8");
    }
}
