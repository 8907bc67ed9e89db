pub mod categories;
pub mod debug;
pub mod events;
pub mod health;
pub mod products;
pub mod receipts;
pub mod users;
