//! Listener references and delegates.
//!
//! The dispatcher never owns a listener. It keeps a [`ListenerRef`], a weak reference
//! that can report whether the listener is still alive, and a [`Delegate`], the callback
//! that runs against the listener once it has been upgraded.
//!
//! Delegates compare by identity: cloning a delegate yields the same binding, and two
//! delegates built from identical closures are still different bindings. This is what
//! [`Dispatcher::unsubscribe`](crate::Dispatcher::unsubscribe) matches on.

use std::{
    any::Any,
    fmt,
    sync::{Arc, Weak},
};

use crate::event::Event;

type Callback<L> = dyn Fn(&L, &Event) + Send + Sync;

/// A non-owning reference to a listener of any type.
#[derive(Clone)]
pub struct ListenerRef {
    weak: Weak<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ListenerRef {
    /// Reference the listener behind a weak pointer.
    pub fn new<L: Any + Send + Sync>(listener: &Weak<L>) -> Self {
        let weak: Weak<dyn Any + Send + Sync> = listener.clone();
        Self {
            weak,
            type_name: std::any::type_name::<L>(),
        }
    }

    /// `true` while at least one strong reference to the listener exists.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// `true` if both references point at the same listener allocation.
    #[inline]
    pub fn same_listener(&self, other: &ListenerRef) -> bool {
        Weak::ptr_eq(&self.weak, &other.weak)
    }

    /// The Rust type name of the listener.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<L: Any + Send + Sync> From<&Weak<L>> for ListenerRef {
    fn from(listener: &Weak<L>) -> Self {
        Self::new(listener)
    }
}

impl<L: Any + Send + Sync> From<&Arc<L>> for ListenerRef {
    fn from(listener: &Arc<L>) -> Self {
        Self::new(&Arc::downgrade(listener))
    }
}

/// Anything the dispatcher can take a weak reference to a listener from.
pub trait AsListener<L> {
    fn as_weak(&self) -> Weak<L>;
}

impl<L> AsListener<L> for Arc<L> {
    fn as_weak(&self) -> Weak<L> {
        Arc::downgrade(self)
    }
}

impl<L> AsListener<L> for Weak<L> {
    fn as_weak(&self) -> Weak<L> {
        Weak::clone(self)
    }
}

impl fmt::Debug for ListenerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRef")
            .field("type", &self.type_name)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A callback bound to listeners of type `L`, or an unbound placeholder.
pub struct Delegate<L> {
    callback: Option<Arc<Callback<L>>>,
}

impl<L> Delegate<L> {
    /// Bind a callback.
    pub fn new(callback: impl Fn(&L, &Event) + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// A delegate with nothing bound. Subscribing with it is rejected.
    pub const fn unbound() -> Self {
        Self { callback: None }
    }

    /// `true` if a callback is bound.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.callback.is_some()
    }

    /// `true` if both delegates share one binding. Unbound delegates share nothing.
    pub fn same_binding(&self, other: &Delegate<L>) -> bool {
        match (&self.callback, &other.callback) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Run the callback if one is bound. Returns whether it ran.
    pub fn execute_if_bound(&self, listener: &L, event: &Event) -> bool {
        match &self.callback {
            Some(callback) => {
                callback(listener, event);
                true
            }
            None => false,
        }
    }

    /// The address of the binding, used to match delegates once their type is erased.
    pub(crate) fn binding_addr(&self) -> Option<usize> {
        self.callback
            .as_ref()
            .map(|callback| Arc::as_ptr(callback) as *const () as usize)
    }
}

impl<L> Clone for Delegate<L> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
        }
    }
}

impl<L> Default for Delegate<L> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<L> fmt::Debug for Delegate<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("binding", &self.binding_addr())
            .finish()
    }
}
