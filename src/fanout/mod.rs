//! Fan-out decoration of a stream provider
//!
//! The decorator implements the same provider contract as the provider it
//! wraps, so callers cannot tell them apart. Matched streams broadcast every
//! published item to their targets; unmatched streams behave exactly as the
//! undecorated provider would.
//!
//! # Architecture
//!
//! ```text
//!              FanOutProvider (StreamProvider)
//!              ┌──────────────────────────────┐
//!   get_stream │ inner.get_stream(id)         │
//!   ─────────► │ match set: computed once,    │
//!              │ cached per stream id         │
//!              └──────────────┬───────────────┘
//!                             ▼
//!              FanOutHandle (StreamHandle)
//!   publish    ┌──────────────────────────────┐
//!   ─────────► │ inner.publish(item)          │──► direct subscribers
//!              │ dispatch ──► target 1        │
//!              │ (concurrent, ► target 2      │
//!              │  in order)  ► target N       │
//!              └──────────────────────────────┘
//! ```

pub mod decorator;
pub mod handle;

pub use decorator::FanOutProvider;
pub use handle::FanOutHandle;
