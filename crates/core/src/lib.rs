//! Emporia Core - Cart domain library.
//!
//! This crate owns the shopping cart aggregate used by the storefront:
//! line items, the running item count, the persistence seam, and the
//! order-summary rule consumed by the cart and checkout pages.
//!
//! # Architecture
//!
//! The core crate contains no HTTP, no framework types, and no direct I/O.
//! Persistence goes through the [`storage::CartStorage`] capability so the
//! cart logic can be exercised against an in-memory fake.
//!
//! # Modules
//!
//! - [`cart`] - The [`cart::CartStore`] aggregate and its line-item types
//! - [`storage`] - Persistence capability and the in-memory implementation
//! - [`summary`] - Subtotal / shipping / total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod storage;
pub mod summary;

pub use cart::{CartLineItem, CartState, CartStore, ProductSnapshot};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use summary::{FLAT_SHIPPING_RATE, FREE_SHIPPING_THRESHOLD, OrderSummary};
