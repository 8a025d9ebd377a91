pub mod addresses;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod hospitals;
pub mod import;
pub mod offers;
pub mod orders;
pub mod products;
pub mod wallet;
