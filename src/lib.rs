#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod render;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::db::establish_connection_pool;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::render::PrintRenderer;
    use crate::repository::DieselRepository;
    use crate::repository::local::JsonLedgerStore;
    use crate::routes::admin::{
        add_admin_user, post_quote_message, show_dashboard, show_quote_request,
        show_quote_requests, show_users, toggle_admin_user, update_quote_status,
    };
    use crate::routes::ledgers::{
        export_ledger, print_ledger, save_ledger, show_builder, show_ledgers,
    };
    use crate::routes::main::{
        logout, not_assigned, send_contact, show_about, show_contact, show_index,
        show_portfolio, show_service, show_services,
    };
    use crate::routes::quotes::{
        create_quote_request, post_my_quote_message, show_my_quote, show_my_quotes,
        show_quote_request as show_quote_request_form, update_my_quote_status,
    };

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = DieselRepository::new(pool);
        let local_store = web::Data::new(JsonLedgerStore::new(&server_config.local_store_dir));

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::derive_from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;
        let renderer = PrintRenderer::new()
            .map_err(|e| std::io::Error::other(format!("Print template error: {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Starting server on {}:{}",
            server_config.address,
            server_config.port
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(show_index)
                .service(show_about)
                .service(show_services)
                .service(show_service)
                .service(show_portfolio)
                .service(show_contact)
                .service(send_contact)
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(not_assigned)
                        .service(show_quote_request_form)
                        .service(create_quote_request)
                        .service(show_my_quotes)
                        .service(show_my_quote)
                        .service(post_my_quote_message)
                        .service(update_my_quote_status)
                        .service(show_dashboard)
                        .service(show_quote_requests)
                        .service(show_quote_request)
                        .service(post_quote_message)
                        .service(update_quote_status)
                        .service(show_users)
                        .service(add_admin_user)
                        .service(toggle_admin_user)
                        .service(show_ledgers)
                        .service(show_builder)
                        .service(save_ledger)
                        .service(print_ledger)
                        .service(export_ledger)
                        .service(logout),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(local_store.clone())
                .app_data(web::Data::new(renderer.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
