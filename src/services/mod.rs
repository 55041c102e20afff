pub mod cart_service;
pub mod driver_service;
pub mod inventory_service;
pub mod order_service;
pub mod product_service;
