//! Fixed-stride UUID chains
//!
//! Several columns (friend lists, bamboo memberships) store an ordered list
//! of UUIDs as one concatenated string, 36 characters per element - the
//! canonical UUID text length. The stride is fixed: a chain whose length is
//! not a multiple of 36, or that contains a segment without the UUID shape,
//! is rejected at parse time.

use std::fmt;

use crate::error::UuidListError;
use crate::security::is_valid_uuid;

/// Number of characters one UUID occupies in a chain.
pub const UUID_TEXT_LEN: usize = 36;

/// An ordered sequence of UUIDs stored as one fixed-stride string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UuidList {
    chain: String,
}

impl UuidList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw chain, validating stride and the shape of every segment.
    pub fn parse(chain: &str) -> Result<Self, UuidListError> {
        if chain.len() % UUID_TEXT_LEN != 0 {
            return Err(UuidListError::MalformedChain);
        }

        let list = Self {
            chain: chain.to_string(),
        };

        for uuid in list.iter() {
            if !is_valid_uuid(uuid) {
                return Err(UuidListError::InvalidUuid(uuid.to_string()));
            }
        }

        Ok(list)
    }

    /// A list holding exactly one UUID.
    pub fn single(uuid: &str) -> Result<Self, UuidListError> {
        let mut list = Self::new();
        list.append(uuid)?;
        Ok(list)
    }

    /// Number of UUIDs in the chain.
    pub fn len(&self) -> usize {
        self.chain.len() / UUID_TEXT_LEN
    }

    /// True when the chain holds no UUIDs.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// The raw chain.
    pub fn as_str(&self) -> &str {
        &self.chain
    }

    /// UUID at `index`.
    pub fn get(&self, index: usize) -> Result<&str, UuidListError> {
        let start = self.offset(index)?;
        Ok(&self.chain[start..start + UUID_TEXT_LEN])
    }

    /// Replace the UUID at `index`.
    pub fn set(&mut self, index: usize, uuid: &str) -> Result<(), UuidListError> {
        if !is_valid_uuid(uuid) {
            return Err(UuidListError::InvalidUuid(uuid.to_string()));
        }

        let start = self.offset(index)?;
        self.chain.replace_range(start..start + UUID_TEXT_LEN, uuid);
        Ok(())
    }

    /// Append a UUID at the end of the chain.
    pub fn append(&mut self, uuid: &str) -> Result<(), UuidListError> {
        if !is_valid_uuid(uuid) {
            return Err(UuidListError::InvalidUuid(uuid.to_string()));
        }

        self.chain.push_str(uuid);
        Ok(())
    }

    /// Remove and return the UUID at `index`.
    pub fn remove(&mut self, index: usize) -> Result<String, UuidListError> {
        let start = self.offset(index)?;
        let removed: String = self.chain.drain(start..start + UUID_TEXT_LEN).collect();
        Ok(removed)
    }

    /// Remove and return the UUID at `index`, or the last one when no index
    /// is given.
    pub fn pop(&mut self, index: Option<usize>) -> Result<String, UuidListError> {
        if self.is_empty() {
            return Err(UuidListError::PopOnEmpty);
        }

        self.remove(index.unwrap_or(self.len() - 1))
    }

    /// True when `uuid` appears in the chain.
    pub fn contains(&self, uuid: &str) -> bool {
        self.iter().any(|element| element == uuid)
    }

    /// Iterate over the UUIDs in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        (0..self.len()).map(move |index| {
            let start = index * UUID_TEXT_LEN;
            &self.chain[start..start + UUID_TEXT_LEN]
        })
    }

    fn offset(&self, index: usize) -> Result<usize, UuidListError> {
        if index >= self.len() {
            return Err(UuidListError::OutOfRange {
                index,
                len: self.len(),
            });
        }

        Ok(index * UUID_TEXT_LEN)
    }
}

impl fmt::Display for UuidList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chain)
    }
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
