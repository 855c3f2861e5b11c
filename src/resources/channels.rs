//! Texture Channel Masks
//!
//! A [`TextureChannels`] value records which texture roles of a material
//! currently have a bound texture. It is the key used to select (and
//! compile) a shader variant: every material with the same mask shares the
//! same program.

use std::collections::BTreeMap;
use std::sync::Arc;

use bitflags::bitflags;

use crate::resources::texture::{Texture, TextureRole};

bitflags! {
    /// One bit per [`TextureRole`], in declaration order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
    pub struct TextureChannels: u8 {
        const ALBEDO    = 1 << 0;
        const ROUGHNESS = 1 << 1;
        const METALLIC  = 1 << 2;
        const NORMAL    = 1 << 3;
        const HEIGHT    = 1 << 4;
        const OCCLUSION = 1 << 5;
        const EMISSION  = 1 << 6;
        const MASK      = 1 << 7;
    }
}

/// Role → texture table owned by a material.
pub type TextureSlots = BTreeMap<TextureRole, Arc<Texture>>;

impl TextureChannels {
    /// Builds a mask from a list of roles. `Unknown` contributes nothing.
    #[must_use]
    pub fn from_roles(roles: impl IntoIterator<Item = TextureRole>) -> Self {
        roles
            .into_iter()
            .fold(Self::empty(), |mask, role| mask | role.channel())
    }

    /// Whether the bit for `role` is set.
    #[inline]
    #[must_use]
    pub fn has_role(self, role: TextureRole) -> bool {
        let channel = role.channel();
        !channel.is_empty() && self.contains(channel)
    }

    /// Iterates the roles whose bit is set, in role order.
    pub fn roles(self) -> impl Iterator<Item = TextureRole> {
        TextureRole::ALL
            .into_iter()
            .filter(move |role| self.has_role(*role))
    }

    /// Index of this mask in a dense `0..256` table.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.bits())
    }
}

/// Computes the mask for a slot table: bit *i* set iff role *i* is present.
#[must_use]
pub fn derive_mask(slots: &TextureSlots) -> TextureChannels {
    TextureChannels::from_roles(slots.keys().copied())
}
