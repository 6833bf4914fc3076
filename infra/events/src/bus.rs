use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{trace, warn};

/// Buffer used when a broadcast channel is created implicitly.
/// Shell notifications are small and consumed promptly.
const DEFAULT_CAPACITY: usize = 64;

/// Supported channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Fan-out: every subscriber sees every event, lagging ones skip ahead.
    Broadcast { capacity: usize },
    /// Latest value: subscribers observe only the most recent event.
    Watch,
}

/// Marker trait for types that can travel across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` implements it.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Channel {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

impl Channel {
    fn sender<S: Clone + 'static, T: Event>(&self) -> Result<S, EventBusError> {
        self.sender.downcast_ref::<S>().cloned().ok_or_else(|| EventBusError::TypeMismatch {
            message: type_name::<T>().into(),
            context: Some("Unexpected sender type".into()),
        })
    }
}

/// A thread-safe, type-indexed event bus.
///
/// Each event type owns exactly one channel, created on first use. Cloning the
/// bus is cheap and every clone shares the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Channel>>>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T`.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is already bound to a
    /// watch channel.
    ///
    /// # Examples
    /// ```rust
    /// use sailor_event_bus::EventBus;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Selected(&'static str);
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), sailor_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<Selected>()?;
    /// bus.publish(Selected("boats"))?;
    /// assert_eq!(rx.recv().await.unwrap().0, "boats");
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to broadcast events of type `T` with an explicit buffer size.
    ///
    /// The capacity only matters for the call that creates the channel.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] for a zero capacity and
    /// [`EventBusError::ChannelKindMismatch`] if `T` is bound to a watch channel.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be >= 1".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event to every current broadcast subscriber.
    ///
    /// Returns how many subscribers received it; zero is not an error.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is bound to a watch channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(Arc::new(event)).unwrap_or(0);
        trace!(event = type_name::<T>(), delivered, "Event dispatched");
        Ok(delivered)
    }

    /// Subscribes to the latest value of `T`, seeding the channel with `initial`
    /// when it does not exist yet.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is bound to a broadcast channel.
    ///
    /// # Examples
    /// ```rust
    /// use sailor_event_bus::EventBus;
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum Phase { Idle, Ready }
    ///
    /// # fn main() -> Result<(), sailor_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let rx = bus.subscribe_watch(Phase::Idle)?;
    /// bus.publish_watch(Phase::Ready)?;
    /// assert_eq!(**rx.borrow(), Phase::Ready);
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe_watch<T: Event>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        let sender = self.watch_sender::<T>(move || Arc::new(initial))?;
        Ok(sender.subscribe())
    }

    /// Replaces the latest value of `T`, creating the channel if needed.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is bound to a broadcast channel.
    pub fn publish_watch<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        let event = Arc::new(event);
        let sender = self.watch_sender::<T>(|| Arc::clone(&event))?;
        sender.send_replace(event);
        trace!(event = type_name::<T>(), "Watch value replaced");
        Ok(())
    }

    /// Returns the current value of a watch channel, if one exists for `T`.
    #[must_use]
    pub fn latest<T: Event>(&self) -> Option<Arc<T>> {
        let channels = self.channels.read();
        let channel = channels.get(&TypeId::of::<T>())?;
        let sender = channel.sender.downcast_ref::<watch::Sender<Arc<T>>>()?;
        let latest = sender.borrow().clone();
        Some(latest)
    }

    /// Drops every channel; receivers observe closure.
    ///
    /// Returns the number of channels that were closed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(channel) = self.channels.read().get(&id) {
            return match channel.kind {
                ChannelKind::Broadcast { capacity: existing } => {
                    if existing != capacity && capacity != DEFAULT_CAPACITY {
                        warn!(
                            event = type_name::<T>(),
                            existing,
                            requested = capacity,
                            "Broadcast channel already initialized with a different capacity"
                        );
                    }
                    channel.sender::<broadcast::Sender<Arc<T>>, T>()
                },
                ChannelKind::Watch => Err(kind_mismatch::<T>(ChannelKind::Watch)),
            };
        }

        let mut channels = self.channels.write();
        let channel = channels.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), capacity, "Initializing broadcast channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Channel { kind: ChannelKind::Broadcast { capacity }, sender: Box::new(tx) }
        });
        match channel.kind {
            ChannelKind::Broadcast { .. } => channel.sender::<broadcast::Sender<Arc<T>>, T>(),
            ChannelKind::Watch => Err(kind_mismatch::<T>(ChannelKind::Watch)),
        }
    }

    fn watch_sender<T: Event>(
        &self,
        seed: impl FnOnce() -> Arc<T>,
    ) -> Result<watch::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(channel) = self.channels.read().get(&id) {
            return existing_watch::<T>(channel);
        }

        let mut channels = self.channels.write();
        if let Some(channel) = channels.get(&id) {
            return existing_watch::<T>(channel);
        }

        trace!(event = type_name::<T>(), "Initializing watch channel");
        let (tx, _) = watch::channel::<Arc<T>>(seed());
        channels.insert(id, Channel { kind: ChannelKind::Watch, sender: Box::new(tx.clone()) });
        Ok(tx)
    }
}

fn existing_watch<T: Event>(channel: &Channel) -> Result<watch::Sender<Arc<T>>, EventBusError> {
    match channel.kind {
        ChannelKind::Watch => channel.sender::<watch::Sender<Arc<T>>, T>(),
        kind @ ChannelKind::Broadcast { .. } => Err(kind_mismatch::<T>(kind)),
    }
}

fn kind_mismatch<T: Event>(found: ChannelKind) -> EventBusError {
    EventBusError::ChannelKindMismatch {
        message: format!("{} is bound to {found:?}", type_name::<T>()).into(),
        context: None,
    }
}
