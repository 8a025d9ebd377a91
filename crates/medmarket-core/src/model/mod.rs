//! DTOs mirrored from the marketplace backend's JSON responses.
//!
//! The backend owns every invariant; the types here only carry data and a few
//! client-side checks used before a request is sent.

pub mod cart;
pub mod hospital;
pub mod offer;
pub mod order;
pub mod product;
pub mod wallet;

pub use cart::{AddToCart, CartItem};
pub use hospital::{DeliveryAddress, HospitalProfile};
pub use offer::{ChatMessage, NewOffer, Offer, OfferAction, OfferItem, OfferStatus};
pub use order::{DeliveryQuote, Order, OrderItem, OrderStatus, OrderView};
pub use product::{NewProduct, Product};
pub use wallet::{Direction, TransactionKind, WalletTransaction};

/// Backend record identifier
pub type Id = i64;
