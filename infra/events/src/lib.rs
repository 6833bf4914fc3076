//! # Event Bus
//!
//! A small, type-indexed event bus used by the shell to decouple the
//! navigation presenter, the loader state machine and whoever renders them.
//!
//! ## Channel kinds
//!
//! * **Broadcast**: fan-out notifications such as "a module was selected".
//! * **Watch**: the latest value only, used for the loader state so late
//!   subscribers immediately see where the content area stands.
//!
//! Channels are created lazily on first use, keyed by the event's Rust type.
//!
//! # Example
//!
//! ```rust
//! use sailor_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Debug, PartialEq)]
//! enum Nav { Selected(&'static str), Logout }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<Nav>()?;
//!     bus.publish(Nav::Logout)?;
//!
//!     assert_eq!(rx.recv_event().await.as_deref(), Some(&Nav::Logout));
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
