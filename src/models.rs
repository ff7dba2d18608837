pub mod auth;
pub mod cart_item;
pub mod lead;
pub mod metadata;
pub mod order;
pub mod totals;
