//! Demo console: serves the seeded backend locally, then drives the users table over HTTP.
//!
//! Run from repo root: `cargo run -p demo-console`

use admin_console_sdk::resources::{seed::demo_backend, AdminApis};
use admin_console_sdk::{logging, ClientConfig, ReqwestClient, TableController, TableView};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("admin_console_sdk=info,demo_console=info");
    let mut config = ClientConfig::from_env()?;

    let backend = demo_backend()?;
    let app = match config.api_prefix.trim_end_matches('/') {
        "" => backend.router(),
        prefix => axum::Router::new().nest(prefix, backend.router()),
    };
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "demo backend stopped");
        }
    });
    config.base_url = format!("http://{}", addr);
    tracing::info!("demo backend listening on {}", config.base_url);

    let apis = AdminApis::new(Arc::new(ReqwestClient::from_config(&config)))?;
    let schemas = apis.schemas()?;
    let users = TableController::from_config(apis.users.clone(), schemas.users.clone(), &config);

    users.load().await?;
    users.load_relations().await?;
    print_table(&users);

    users.toggle_sort("fullName").await?;
    users.set_filter("departmentId", 2).await?;
    users.select_page();
    print_table(&users);

    users.clear_filters().await?;
    users.toggle_sort("fullName").await?;
    users.toggle_column("createdAt")?;
    print_table(&users);

    let members = apis.department_members(1);
    let all = admin_console_sdk::service::adapters::list_all(&members, "", &Default::default(), 2).await?;
    tracing::info!(count = all.len(), "engineering members");
    Ok(())
}

fn print_table(table: &TableController<admin_console_sdk::resources::UserApi>) {
    let view = TableView::render(table.schema(), &table.snapshot(), &table.relation_labels());
    println!("{}\n", view);
}
