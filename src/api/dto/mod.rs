pub mod categories;
pub mod events;
pub mod products;
pub mod receipts;
pub mod users;
