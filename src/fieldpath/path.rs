//! Path type.

use std::fmt;

/// Path is a sequence of map keys leading from a document root to a field.
///
/// Lists are never descended into: a list is replaced as a whole, so the
/// deepest element of a path always names a map key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    elements: Vec<String>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path from a list of field names.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Path {
            elements: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the number of elements in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the field names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(String::as_str)
    }

    /// Appends a field name.
    pub fn push(&mut self, field: impl Into<String>) {
        self.elements.push(field.into());
    }

    /// Removes and returns the last field name.
    pub fn pop(&mut self) -> Option<String> {
        self.elements.pop()
    }

    /// Returns the last field name.
    pub fn last(&self) -> Option<&str> {
        self.elements.last().map(String::as_str)
    }

    /// Creates a new path with the given field appended.
    pub fn with(&self, field: impl Into<String>) -> Self {
        let mut new_path = self.clone();
        new_path.push(field);
        new_path
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Path::from_fields(iter)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, ".{}", element)?;
        }
        Ok(())
    }
}
