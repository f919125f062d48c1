//! The list pipeline shared by every list view: filter state, filtering,
//! sorting, pagination and projection into view models.

pub mod page;
pub mod pipeline;
pub mod projector;
pub mod state;

pub use page::{Page, paginate};
pub use pipeline::{DateRange, ListView, SortDirection, filter_records, run, sort_records};
pub use state::{Facet, FilterState};

/// A closed set of named options (tabs, sort keys) with a fallback default.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];
    const DEFAULT: Self;

    fn name(self) -> &'static str;

    /// Unknown or empty names resolve to [`Choice::DEFAULT`].
    fn parse_or_default(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .unwrap_or(Self::DEFAULT)
    }
}

/// Declares a [`Choice`] enum; the first variant listed is the default.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $default:ident => $default_wire:literal
            $(, $variant:ident => $wire:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $default,
            $($variant),*
        }

        impl $crate::listing::Choice for $name {
            const ALL: &'static [Self] = &[$name::$default, $($name::$variant),*];
            const DEFAULT: Self = $name::$default;

            fn name(self) -> &'static str {
                match self {
                    $name::$default => $default_wire,
                    $($name::$variant => $wire),*
                }
            }
        }
    };
}

pub(crate) use choice_enum;
