//! Opaque identifiers for titles and packages.
//!
//! Both are string tokens as they appear in the inputs. They are kept as
//! separate types so an app id can never be used where a package id is
//! expected.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::new(id)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                compare_ids(&self.0, &other.0)
            }
        }
    };
}

opaque_id!(
    /// A title in the library (game, DLC, tool), as written by Steam.
    AppId
);

opaque_id!(
    /// A license package granting one or more titles.
    PackageId
);

/// Numeric ids sort numerically, anything else after them lexically.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_token() {
        assert_eq!(AppId::from("440").to_string(), "440");
        assert_eq!(PackageId::from("0").as_str(), "0");
    }

    #[test]
    fn numeric_ordering() {
        let mut ids: Vec<AppId> = ["100", "20", "3"].into_iter().map(AppId::from).collect();
        ids.sort();
        assert_eq!(ids, vec![AppId::from("3"), AppId::from("20"), AppId::from("100")]);
    }

    #[test]
    fn non_numeric_sorts_last() {
        let mut ids = vec![AppId::from("abc"), AppId::from("7")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "7");
    }

    #[test]
    fn leading_zeros_stay_distinct() {
        let a = AppId::from("07");
        let b = AppId::from("7");
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }
}
