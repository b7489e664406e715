use std::path::PathBuf;

use actix_files as fs;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer};
use clap::Parser;
use folio::ClientConfig;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Client-side routes. Each serves the app shell so deep links and reloads work.
const SPA_ROUTES: [&str; 5] = ["/", "/home", "/about", "/contact", "/upload"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Serves the portfolio web app", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "FOLIO_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Base URL of the portfolio API, handed to the client at /config
    #[arg(long, env = "FOLIO_API_URL", default_value = "")]
    api_url: String,

    /// Directory with static assets
    #[arg(long, env = "FOLIO_STATIC_DIR", default_value = "./static")]
    static_dir: PathBuf,

    /// Directory with the compiled wasm bundle
    #[arg(long, env = "FOLIO_PKG_DIR", default_value = "./pkg")]
    pkg_dir: PathBuf,
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

#[get("/config")]
async fn client_config(config: web::Data<ClientConfig>) -> HttpResponse {
    HttpResponse::Ok().json(config.get_ref())
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(SPA_ROUTES).route(web::get().to(index)))
        .service(client_config);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("starting portfolio host at http://{}", args.bind);
    if args.api_url.is_empty() {
        log::info!("api requests go to the page origin");
    } else {
        log::info!("api base url: {}", args.api_url);
    }

    let config = web::Data::new(ClientConfig {
        api_base_url: args.api_url.clone(),
    });
    let static_dir = args.static_dir.clone();
    let pkg_dir = args.pkg_dir.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .wrap(Logger::default())
            .configure(routes)
            .service(fs::Files::new("/pkg", pkg_dir.clone()))
            .service(fs::Files::new("/static", static_dir.clone()))
    })
    .bind(&args.bind)?
    .run()
    .await
}
