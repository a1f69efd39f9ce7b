#![forbid(unsafe_code)]

//! Synchronous observer list with RAII subscriptions.
//!
//! # Design
//!
//! [`Broadcaster<E>`] keeps subscribers as weak references to callbacks
//! whose strong half lives in the [`Subscription`] guard handed back to the
//! caller. Publishing upgrades the live ones and invokes them in
//! registration order, on the caller's stack, before returning.
//!
//! # Re-entrancy
//!
//! The subscriber list is borrowed only while collecting callbacks, never
//! while running them. A callback may therefore publish again or register
//! new subscribers; the new subscribers are first called on the next
//! publish. There is no recursion guard: a callback that publishes a
//! different event on every call loops forever.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: guards stored indefinitely keep callbacks alive.
//!   Dead weak references are pruned lazily during [`publish`](Broadcaster::publish).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info_span};
use web_time::Instant;

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;

/// An explicit, owned publish/subscribe channel.
///
/// # Invariants
///
/// 1. Subscribers are invoked in registration order.
/// 2. Every live subscriber has been invoked when `publish` returns.
/// 3. A dropped [`Subscription`] is never invoked again.
pub struct Broadcaster<E> {
    channel: &'static str,
    subscribers: RefCell<Vec<CallbackWeak<E>>>,
}

impl<E> std::fmt::Debug for Broadcaster<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("channel", &self.channel)
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<E: 'static> Broadcaster<E> {
    /// Create a channel. `channel` names it in tracing output.
    #[must_use]
    pub fn new(channel: &'static str) -> Self {
        Self {
            channel,
            subscribers: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn channel(&self) -> &'static str {
        self.channel
    }

    /// Register a callback. Dropping the returned guard deregisters it.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let strong: CallbackRc<E> = Rc::new(callback);
        self.subscribers.borrow_mut().push(Rc::downgrade(&strong));
        // `Rc<dyn Fn(&E)>` cannot coerce to `Rc<dyn Any>`; box the Rc instead.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver `event` to every live subscriber. Returns how many ran.
    pub fn publish(&self, event: &E) -> usize {
        let callbacks: Vec<CallbackRc<E>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        if callbacks.is_empty() {
            return 0;
        }

        let delivered = callbacks.len();
        let started = Instant::now();
        let _span = info_span!(
            "theme.broadcast",
            channel = self.channel,
            subscribers = delivered as u64,
            duration_us = tracing::field::Empty
        )
        .entered();

        for callback in &callbacks {
            callback(event);
        }

        let duration_us = started.elapsed().as_micros() as u64;
        tracing::Span::current().record("duration_us", duration_us);
        debug!(channel = self.channel, delivered, duration_us, "broadcast delivered");
        delivered
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping it drops the only strong reference to the callback, so the weak
/// entry in the broadcaster fails to upgrade from then on.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
