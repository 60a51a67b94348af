#![forbid(unsafe_code)]

//! Sticky (one-shot) modifier state driven by the toolbar's modifier buttons.
//!
//! # Invariants
//!
//! 1. The set starts empty.
//! 2. [`ModifierState::toggle`] flips exactly one flag.
//! 3. After the bridge finishes an input event the set is empty again, so a
//!    modifier never leaks into a second keystroke unless re-toggled.

use bitflags::bitflags;

use crate::input::LogicalKey;

bitflags! {
    /// Modifiers that can be stuck on from the toolbar.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierSet: u8 {
        const CONTROL   = 0b01;
        const ALTERNATE = 0b10;
    }
}

/// A single sticky modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Control,
    Alternate,
}

impl Modifier {
    /// The modifier a toolbar key controls, if any.
    #[must_use]
    pub const fn from_key(key: LogicalKey) -> Option<Self> {
        match key {
            LogicalKey::Control => Some(Self::Control),
            LogicalKey::Alternate => Some(Self::Alternate),
            _ => None,
        }
    }

    #[must_use]
    pub const fn flag(self) -> ModifierSet {
        match self {
            Self::Control => ModifierSet::CONTROL,
            Self::Alternate => ModifierSet::ALTERNATE,
        }
    }

    /// The toolbar key that toggles this modifier.
    #[must_use]
    pub const fn key(self) -> LogicalKey {
        match self {
            Self::Control => LogicalKey::Control,
            Self::Alternate => LogicalKey::Alternate,
        }
    }
}

/// Owner of the sticky modifier set.
#[derive(Debug, Default, Clone)]
pub struct ModifierState {
    current: ModifierSet,
}

impl ModifierState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: ModifierSet::empty(),
        }
    }

    /// Flip `modifier` and return whether it is now active.
    ///
    /// The return value is the highlight state the caller should show on the
    /// corresponding button.
    pub fn toggle(&mut self, modifier: Modifier) -> bool {
        self.current.toggle(modifier.flag());
        let active = self.current.contains(modifier.flag());
        tracing::debug!(?modifier, active, "modifier toggled");
        active
    }

    /// Active modifiers, without clearing them.
    #[must_use]
    pub const fn current(&self) -> ModifierSet {
        self.current
    }

    /// Whether `modifier` is currently stuck on.
    #[must_use]
    pub const fn is_active(&self, modifier: Modifier) -> bool {
        self.current.contains(modifier.flag())
    }

    /// Drop every sticky modifier.
    pub fn clear(&mut self) {
        self.current = ModifierSet::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn toggle_reports_new_state() {
        let mut state = ModifierState::new();
        assert!(state.toggle(Modifier::Control));
        assert_eq!(state.current(), ModifierSet::CONTROL);
        assert!(!state.toggle(Modifier::Control));
        assert!(state.current().is_empty());
    }

    #[test]
    fn toggles_are_independent() {
        let mut state = ModifierState::new();
        state.toggle(Modifier::Control);
        state.toggle(Modifier::Alternate);
        assert_eq!(state.current(), ModifierSet::CONTROL | ModifierSet::ALTERNATE);
        state.toggle(Modifier::Control);
        assert_eq!(state.current(), ModifierSet::ALTERNATE);
        assert!(state.is_active(Modifier::Alternate));
        assert!(!state.is_active(Modifier::Control));
    }

    #[test]
    fn only_modifier_keys_map_to_modifiers() {
        for key in LogicalKey::ALL {
            match Modifier::from_key(key) {
                Some(m) => assert_eq!(m.key(), key),
                None => assert!(!key.is_modifier()),
            }
        }
    }

    proptest! {
        #[test]
        fn clear_always_empties(toggles in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut state = ModifierState::new();
            for control in toggles {
                state.toggle(if control { Modifier::Control } else { Modifier::Alternate });
            }
            state.clear();
            prop_assert_eq!(state.current(), ModifierSet::empty());
        }
    }
}
