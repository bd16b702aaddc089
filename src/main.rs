use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use fleet_logistics::config::environment::EnvironmentConfig;
use fleet_logistics::create_app;
use fleet_logistics::database::{self, connection::mask_database_url};
use fleet_logistics::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Fleet Logistics - Delivery Order Lifecycle API");
    info!("=================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let database_url = std::env::var("DATABASE_URL").unwrap_or_default();
    info!("🗄️  Conectando a {}", mask_database_url(&database_url));

    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    database::run_migrations(&pool).await?;
    info!("✅ Migraciones aplicadas");

    // Crear router de la API
    let addr: SocketAddr = config.server_addr().parse()?;
    let app_state = AppState::new(pool, config);
    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /health - Health check");
    info!("📦 Delivery Orders:");
    info!("   POST   /api/delivery-orders - Crear orden (admin/owner)");
    info!("   GET    /api/delivery-orders - Listar órdenes (driver: solo propias)");
    info!("   GET    /api/delivery-orders/me - Tareas del driver autenticado");
    info!("   GET    /api/delivery-orders/:id - Obtener orden");
    info!("   PATCH  /api/delivery-orders/:id/start - Salir hacia destino");
    info!("   PATCH  /api/delivery-orders/:id/arrive - Llegada a destino");
    info!("   PATCH  /api/delivery-orders/:id/return - Regreso a base");
    info!("   PATCH  /api/delivery-orders/:id/complete - Completar orden");
    info!("   PATCH  /api/delivery-orders/:id/cancel - Cancelar orden (admin/owner)");
    info!("💸 Driver Expenses:");
    info!("   POST   /api/driver-expenses - Crear gasto (multipart, driver)");
    info!("   GET    /api/driver-expenses - Listar gastos");
    info!("   GET    /api/driver-expenses/:id - Obtener gasto");
    info!("   DELETE /api/driver-expenses/:id - Borrar gasto");
    info!("🚗 Resources:");
    info!("   GET    /api/resources/drivers/available - Drivers disponibles");
    info!("   GET    /api/resources/vehicles/available - Vehículos disponibles");
    info!("   POST   /api/resources/reconcile - Reconciliar flags de disponibilidad");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
