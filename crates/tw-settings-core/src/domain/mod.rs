//! Domain types for the watch settings store.
//!
//! Pure data and rules with no storage or I/O dependencies:
//!
//! - **`schema`** – the [`schema::Config`] aggregate, its sub-configs, and the
//!   in-memory credential rules.
//! - **`bindings`** – a keyed accessor table so settings UIs can read and
//!   write individual fields without aliasing into the schema.

pub mod bindings;
pub mod schema;
