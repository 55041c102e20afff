use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddCartItemRequest, CartLineView, CartView},
        drivers::{
            DriverList, InventoryBatchRequest, InventoryView, RegisterDriverRequest, StockItem,
            StockOp,
        },
        orders::{CreateOrderRequest, OrderList, UpdateNotesRequest},
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    models::{
        Account, Cart, CartLine, DriverProfile, LineItem, Order, OrderStatus, Product, Role,
        StockEntry,
    },
    response::{ApiResponse, Meta},
    routes::{cart, drivers, health, inventory, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        cart::view_cart,
        cart::add_item,
        cart::remove_item,
        orders::create_order,
        orders::list_all_orders,
        orders::list_active_orders,
        orders::my_orders,
        orders::my_active_order,
        orders::get_order,
        orders::accept_order,
        orders::advance_order,
        orders::update_notes,
        orders::cancel_order,
        drivers::register_driver,
        drivers::list_drivers,
        drivers::get_driver,
        inventory::view_inventory,
        inventory::update_inventory
    ),
    components(
        schemas(
            Role,
            Account,
            Product,
            Cart,
            CartLine,
            LineItem,
            Order,
            OrderStatus,
            StockEntry,
            DriverProfile,
            AddCartItemRequest,
            CartView,
            CartLineView,
            CreateOrderRequest,
            UpdateNotesRequest,
            OrderList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            RegisterDriverRequest,
            DriverList,
            StockOp,
            StockItem,
            InventoryBatchRequest,
            InventoryView,
            params::Pagination,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Cart>,
            ApiResponse<CartView>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<DriverProfile>,
            ApiResponse<DriverList>,
            ApiResponse<InventoryView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order lifecycle endpoints"),
        (name = "Drivers", description = "Driver profile endpoints"),
        (name = "Inventory", description = "Driver inventory endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
