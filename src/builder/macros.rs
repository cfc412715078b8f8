//! Macros for ergonomic state definitions.

/// Define a state enum and its `State` implementation.
///
/// The enum derives everything the engine needs (`Clone`, `Copy`, `Ord`,
/// `Hash`, `Debug` and serde), and `name()` returns the variant name.
///
/// # Example
///
/// ```
/// use stateline::core::State;
/// use stateline::state_enum;
///
/// state_enum! {
///     pub enum SaleState {
///         Open,
///         ChangeDue,
///         Complete,
///     }
/// }
///
/// assert_eq!(SaleState::ChangeDue.name(), "ChangeDue");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
