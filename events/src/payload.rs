//! Runtime-typed event payloads.
//!
//! A single event channel carries heterogeneous payloads, so the type check happens at
//! dispatch time. Publishers wrap a value in a [`PayloadValue`], which remembers the
//! value's [`PayloadType`]. Subscriptions can name a required [`PayloadType`] and the
//! dispatcher skips them when the published payload is missing or of another type.
//!
//! # Example
//!
//! ```rust,ignore
//! use rusty_events::Payload;
//!
//! #[derive(Payload, Debug)]
//! struct Damage {
//!     amount: u32,
//! }
//!
//! let value = PayloadValue::new(Damage { amount: 50 });
//! assert!(value.is::<Damage>());
//! assert_eq!(value.downcast_ref::<Damage>().map(|d| d.amount), Some(50));
//! assert_eq!(value.payload_type(), PayloadType::of::<Damage>());
//! ```

use std::{
    any::{Any, TypeId},
    fmt, hash,
};

/// Marker trait for values that can travel with an event.
///
/// # Derive Macro
///
/// Use `#[derive(Payload)]` to implement this trait:
///
/// ```rust,ignore
/// #[derive(Payload)]
/// struct PlayerDied {
///     player: u32,
/// }
/// ```
///
/// # Trait Bounds
///
/// - `'static`: No borrowed data
/// - `Send + Sync`: Payloads may be published from any thread
pub trait Payload: 'static + Send + Sync {}

macro_rules! impl_payload {
    ($($ty:ty),* $(,)?) => {
        $(impl Payload for $ty {})*
    };
}

impl_payload!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

/// The runtime type of a payload.
///
/// Two payload types are equal when their Rust `TypeId`s are equal. The name is kept
/// for diagnostics only.
#[derive(Clone, Copy)]
pub struct PayloadType {
    id: TypeId,
    name: &'static str,
}

impl PayloadType {
    /// The payload type of `T`.
    #[inline]
    pub fn of<T: Payload>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The Rust type id.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The Rust type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for PayloadType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PayloadType {}

impl hash::Hash for PayloadType {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadType({})", self.name)
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased payload together with its runtime type.
pub struct PayloadValue {
    value: Box<dyn Any + Send + Sync>,
    payload_type: PayloadType,
}

impl PayloadValue {
    /// Box a payload.
    pub fn new<T: Payload>(value: T) -> Self {
        Self {
            value: Box::new(value),
            payload_type: PayloadType::of::<T>(),
        }
    }

    /// The runtime type of the boxed value.
    #[inline]
    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// `true` if the boxed value is a `T`.
    #[inline]
    pub fn is<T: Payload>(&self) -> bool {
        self.payload_type.id == TypeId::of::<T>()
    }

    /// Borrow the boxed value as a `T`.
    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadValue")
            .field("type", &self.payload_type.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(crate::Payload, Debug, PartialEq)]
    struct Damage {
        #[allow(dead_code)]
        amount: u32,
    }

    #[derive(crate::Payload)]
    struct Heal;

    #[test]
    fn payload_type_equality_is_by_type() {
        assert_eq!(PayloadType::of::<Damage>(), PayloadType::of::<Damage>());
        assert_ne!(PayloadType::of::<Damage>(), PayloadType::of::<Heal>());
        assert_ne!(PayloadType::of::<i32>(), PayloadType::of::<i64>());
    }

    #[test]
    fn payload_type_names_the_rust_type() {
        assert!(PayloadType::of::<Damage>().name().ends_with("Damage"));
        assert_eq!(PayloadType::of::<i32>().to_string(), "i32");
    }

    #[test]
    fn value_reports_its_type() {
        // Given
        let value = PayloadValue::new(Damage { amount: 50 });

        // Then
        assert!(value.is::<Damage>());
        assert!(!value.is::<Heal>());
        assert_eq!(value.payload_type(), PayloadType::of::<Damage>());
    }

    #[test]
    fn downcast_returns_value_only_for_matching_type() {
        let value = PayloadValue::new(7_i32);

        assert_eq!(value.downcast_ref::<i32>(), Some(&7));
        assert_eq!(value.downcast_ref::<u32>(), None);
    }

    #[test]
    fn debug_shows_type_name() {
        let value = PayloadValue::new(String::from("hello"));

        assert!(format!("{value:?}").contains("String"));
    }
}
