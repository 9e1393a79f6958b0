//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Settings};
use crate::docs::ApiDoc;
use crate::middleware::auth::identify_manager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some(admin) = &settings.admin {
        app_state
            .bootstrap_admin(admin)
            .await
            .context("Falha ao criar o gerente admin inicial.")?;
    }

    let app = router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", settings.bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .context("Erro no servidor Axum")?;

    Ok(())
}

pub fn router(app_state: AppState) -> Router {
    // Login e validação de token: públicos, sem passar pelo middleware
    let customer_public = Router::new()
        .route("/token", post(handlers::auth::customer_token))
        .route("/token/validate", post(handlers::auth::validate_customer_token));

    // O middleware só identifica; quem exige gerente é o extrator nos handlers
    let customer_protected = Router::new()
        .route(
            "/",
            post(handlers::customers::save_customer).get(handlers::customers::list_customers),
        )
        .route("/active", get(handlers::customers::list_active_customers))
        .route(
            "/{id}",
            get(handlers::customers::get_customer).delete(handlers::customers::delete_customer),
        )
        .route(
            "/{id}/block",
            post(handlers::customers::block_customer).delete(handlers::customers::unblock_customer),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            identify_manager,
        ));

    let manager_public = Router::new().route("/token", post(handlers::auth::manager_token));

    let manager_protected = Router::new()
        .route("/", post(handlers::managers::create_manager))
        .route(
            "/products",
            post(handlers::products::save_product).get(handlers::products::list_products),
        )
        .route("/products/{id}", delete(handlers::products::remove_product))
        .route(
            "/sales",
            post(handlers::sales::create_sale).get(handlers::sales::total_sales),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            identify_manager,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/customers", customer_public.merge(customer_protected))
        .nest("/api/managers", manager_public.merge(manager_protected))
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
