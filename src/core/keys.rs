// ============================================================================
// Keys
// ============================================================================
//
// A key is the identity of an item on either side of a mapping. DTOs carry
// the key they were read with; entities get theirs from the store on first
// save. `Key::default()` means "not assigned yet".
//
// ============================================================================

use std::fmt::Debug;

/// Anything that exposes an identity key.
pub trait Keyed {
    type Key: PartialEq + Default + Clone + Debug;

    fn key(&self) -> Self::Key;

    /// True while the key still holds its default value.
    fn is_transient(&self) -> bool {
        self.key() == Self::Key::default()
    }
}
