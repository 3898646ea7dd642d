//! The task list value type and text normalization.

use std::fmt;

/// An ordered sequence of trimmed task lines extracted from fetched text.
///
/// Equality is element-wise and order-sensitive. The last element is never
/// an empty string produced by a trailing line terminator; internal empty
/// lines are preserved.
///
/// # Example
///
/// ```
/// use taskwatch::tasks::TaskList;
///
/// let list = TaskList::normalize("build\r\ntest\r\n");
/// assert_eq!(list.lines(), ["build", "test"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList(Vec<String>);

impl TaskList {
    /// Normalizes raw fetched text into a task list.
    ///
    /// Line-ending variants (`\r\n`, lone `\r`) are unified to `\n` first, so
    /// identical logical content yields an identical list regardless of the
    /// source's line-ending convention. The whole text is trimmed, then split
    /// on `\n`, then each line is trimmed. A single trailing empty element
    /// (from a trailing terminator) is dropped.
    ///
    /// Total on any input; empty input yields an empty list.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
        let trimmed = unified.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        let mut lines: Vec<String> = trimmed.split('\n').map(|l| l.trim().to_string()).collect();
        if lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        Self(lines)
    }

    /// Creates a task list directly from lines.
    ///
    /// Callers are responsible for the invariants [`normalize`] guarantees
    /// (trimmed lines, no trailing empty element).
    ///
    /// [`normalize`]: Self::normalize
    #[must_use]
    pub const fn from_lines(lines: Vec<String>) -> Self {
        Self(lines)
    }

    /// Returns the task lines as a slice.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list contains no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the task lines.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for TaskList {
    /// Joins the task lines with `\n`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in &self.0 {
            if !first {
                writeln!(f)?;
            }
            f.write_str(line)?;
            first = false;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
