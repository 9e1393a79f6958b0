// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::customer_token,
        handlers::auth::validate_customer_token,
        handlers::auth::manager_token,

        // --- Customers ---
        handlers::customers::save_customer,
        handlers::customers::list_customers,
        handlers::customers::list_active_customers,
        handlers::customers::get_customer,
        handlers::customers::delete_customer,
        handlers::customers::block_customer,
        handlers::customers::unblock_customer,

        // --- Managers ---
        handlers::managers::create_manager,

        // --- Products ---
        handlers::products::save_product,
        handlers::products::list_products,
        handlers::products::remove_product,

        // --- Sales ---
        handlers::sales::create_sale,
        handlers::sales::total_sales,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::CustomerTokenPayload,
            models::auth::ManagerTokenPayload,
            models::auth::ValidateTokenPayload,
            models::auth::TokenResponse,
            models::auth::ValidateTokenResponse,

            // --- Customers / Managers ---
            models::customers::Customer,
            models::customers::SaveCustomerPayload,
            models::managers::Manager,
            models::managers::CreateManagerPayload,

            // --- Products ---
            models::products::Product,
            models::products::SaveProductPayload,

            // --- Sales ---
            models::sales::Sale,
            models::sales::SalePosition,
            models::sales::NewSalePosition,
            models::sales::CreateSalePayload,
            models::sales::SalesTotal,
        )
    ),
    tags(
        (name = "Auth", description = "Emissão e validação de tokens"),
        (name = "Customers", description = "Cadastro e bloqueio de clientes"),
        (name = "Managers", description = "Cadastro de gerentes"),
        (name = "Products", description = "Catálogo e saldo de produtos"),
        (name = "Sales", description = "Vendas e totais por gerente")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_token",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
