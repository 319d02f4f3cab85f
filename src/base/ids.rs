//! Identifiers for program model entities.
//!
//! Both id types are plain u32 handles. The entity behind an id is owned by
//! the model that handed it out.

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $display:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(pub u32);

        impl $name {
            #[doc = concat!("Create a new ", stringify!($name), " from a raw index.")]
            #[inline]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw index.
            #[inline]
            pub const fn index(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($display, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// A class in the program model.
    ClassId,
    "class"
);

entity_id!(
    /// A method in the program model.
    ///
    /// Method ids are unique across the whole model, not per class, so they
    /// can key the reflection index directly.
    MethodId,
    "method"
);
