use std::fmt;

use crate::payload::PayloadType;

/// Why a registration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// The listener was already gone (or never existed) when subscribing.
    DeadListener,
    /// The delegate had no callback bound.
    UnboundDelegate,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::DeadListener => write!(f, "listener is not alive"),
            Reason::UnboundDelegate => write!(f, "no delegate bound"),
        }
    }
}

/// Everything that can go wrong between a subscription and its delivery.
///
/// None of these ever escape [`Dispatcher::publish`](crate::Dispatcher::publish). They are
/// reported to the dispatcher's [`Sink`](crate::diagnostics::Sink) and, for
/// registrations, returned from [`Dispatcher::subscribe`](crate::Dispatcher::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A subscription could not be registered.
    InvalidRegistration(Reason),
    /// The listener of a subscription was found dead during a publish.
    StaleListener,
    /// A payload-constrained subscription was offered no payload (`actual` is `None`) or
    /// a payload of another type.
    PayloadMismatch {
        expected: PayloadType,
        actual: Option<PayloadType>,
    },
    /// The listener vanished between the liveness check and the call.
    DeliveryFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRegistration(reason) => write!(f, "invalid registration: {reason}"),
            Error::StaleListener => write!(f, "listener is no longer alive"),
            Error::PayloadMismatch {
                expected,
                actual: None,
            } => write!(f, "no payload passed but {expected} is expected"),
            Error::PayloadMismatch {
                expected,
                actual: Some(actual),
            } => write!(f, "payload type {actual} does not match expected type {expected}"),
            Error::DeliveryFailure => write!(f, "failed to call delegate"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::InvalidRegistration(Reason::UnboundDelegate).to_string(),
            "invalid registration: no delegate bound"
        );
        assert_eq!(
            Error::PayloadMismatch {
                expected: PayloadType::of::<i32>(),
                actual: None
            }
            .to_string(),
            "no payload passed but i32 is expected"
        );
        assert_eq!(
            Error::PayloadMismatch {
                expected: PayloadType::of::<i32>(),
                actual: Some(PayloadType::of::<u8>())
            }
            .to_string(),
            "payload type u8 does not match expected type i32"
        );
    }
}
