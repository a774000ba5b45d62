//! Patchbay Boot layers declaration convenience over the DI core:
//!
//! 1. A fluent builder for plugin creation, read left to right:
//!    what is plugged, into which host, under which policy
//! 2. [`Boot`]: a root router/registry pair assembled in one step, with
//!    an optional process-wide instance for applications that want one
//!
//! # Examples
//!
//! ```rust
//! use patchbay_boot::{plug, plug_with, Boot};
//! use patchbay_di::Host;
//!
//! fn wire() {
//!     let boot = Boot::new(vec![
//!         plug("Scott".to_string())
//!             .into(Host::marked("FIRST_NAME"))
//!             .direct(),
//!         plug_with(|| "Tiger".to_string())
//!             .into(Host::marked("LAST_NAME"))
//!             .lazy(),
//!     ])
//!     .unwrap();
//!
//!     let first = boot
//!         .router()
//!         .resolve(&Host::<String>::marked("FIRST_NAME"))
//!         .unwrap();
//!     assert_eq!(*first, "Scott");
//! }
//! ```

pub mod builder;
pub mod root;

pub use builder::{plug, plug_future, plug_with};
pub use root::{init_root, root, Boot, BootError};
