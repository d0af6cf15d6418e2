//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Enums that cross to the calendar view as plain strings (bulk actions, range
//! classifications) share one conversion implementation. Parsing is
//! case-insensitive; output is the canonical snake_case form.
//!
//! # Example
//!
//! ```rust
//! use artistcal_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Weekday {
//!     Monday,
//!     Tuesday,
//! }
//!
//! impl_domain_enum_conversions!(Weekday {
//!     Monday => "monday",
//!     Tuesday => "tuesday",
//! });
//!
//! assert_eq!("MONDAY".parse::<Weekday>().unwrap(), Weekday::Monday);
//! ```

/// Implements Display and FromStr for a fieldless enum
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
