//! Collision groups for the two kinds of bodies the world creates.
//!
//! Membership bits are kept compatible with existing level data:
//! static world geometry is group value `2`, characters are `128`. Both filter
//! masks allow the low 16 groups, so characters collide with walls and with
//! each other.

use rapier3d::prelude::{Group, InteractionGroups};

use crate::bitmask_flags::BitmaskFlags;

crate::define_bitmask_flags!(CollisionLayer, u32, {
    World = 1,
    Character = 7,
});

/// Filter mask used by every body: all of the low 16 groups.
pub const COLLIDE_WITH_ALL: u32 = 0xFFFF;

pub type LayerMask = BitmaskFlags<u32>;

impl CollisionLayer {
    pub fn membership(self) -> LayerMask {
        LayerMask::from_flags(&[self])
    }

    pub fn filter(self) -> LayerMask {
        LayerMask::new(COLLIDE_WITH_ALL)
    }

    /// Membership/filter pair for a body on this layer.
    pub fn groups(self) -> InteractionGroups {
        InteractionGroups::all()
            .with_memberships(Group::from_bits_truncate(self.membership().bits))
            .with_filter(Group::from_bits_truncate(self.filter().bits))
    }

    /// True if bodies on `self` and `other` generate contacts.
    pub fn collides_with(self, other: CollisionLayer) -> bool {
        self.filter().has(other) && other.filter().has(self)
    }
}
