//! Domain models for the store.
//!
//! These types represent validated domain objects separate from database
//! row types and from the wire DTOs the routes serialize.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use product::Product;
pub use user::{PublicUser, User};
