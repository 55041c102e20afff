pub mod cart;
pub mod drivers;
pub mod orders;
pub mod products;
