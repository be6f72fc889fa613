//! Macro for implementing Display and FromStr for small keyword enums
//!
//! Several domain enums are exchanged with remote services as lowercase
//! keywords (`driving`, `metric`, ...). This macro provides both directions
//! of the conversion in one place.
//!
//! # Example
//!
//! ```rust
//! use helpkit_domain::impl_domain_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shade {
//!     Light,
//!     Dark,
//! }
//!
//! impl_domain_keyword_conversions!(Shade {
//!     Light => "light",
//!     Dark => "dark",
//! });
//!
//! assert_eq!(Shade::Dark.to_string(), "dark");
//! assert_eq!("LIGHT".parse::<Shade>().unwrap(), Shade::Light);
//! ```

/// Implements Display and FromStr for keyword enums
///
/// - Display writes the keyword
/// - FromStr parses case-insensitively and trims surrounding whitespace
#[macro_export]
macro_rules! impl_domain_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Keyword used on the wire
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
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
