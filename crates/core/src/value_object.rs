//! Value object trait: equality by value, not identity.
//!
//! Part attributes (generation, condition, color, size label) and the stock
//! keys derived from them have no identity of their own. Two keys built from
//! the same attributes address the same stock entry.

/// Marker trait for value objects.
///
/// Implementors are immutable, cheap to clone, and compared by their
/// attribute values:
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Color(String);
///
/// impl ValueObject for Color {}
///
/// assert_eq!(Color("black".into()), Color("black".into()));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
