use actix_files as fs;
use actix_web::{
    http::header, middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer,
    Result as ActixResult,
};
use clap::Parser;
use filedrop::config::{ClientConfig, CONFIG_PATH, DEFAULT_API_BASE_URL};
use filedrop::routes::AppRoute;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "FILEDROP_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Directory holding index.html and the compiled pkg/ bundle
    #[arg(long, env = "FILEDROP_STATIC_DIR", default_value = "./static")]
    static_dir: PathBuf,

    /// Base URL of the file-sharing API the front-end talks to
    #[arg(long, env = "FILEDROP_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,
}

#[derive(Clone)]
struct AppState {
    client_config: ClientConfig,
    static_dir: PathBuf,
}

async fn client_config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.client_config)
}

// Client-side routes all get the same shell; anything else goes back to the upload page
async fn spa_entry(req: HttpRequest, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match AppRoute::from_path(req.path()) {
        Some(route) => {
            log::debug!("Serving app shell for {:?}", route);
            let index = fs::NamedFile::open_async(state.static_dir.join("index.html")).await?;
            Ok(index.into_response(&req))
        }
        None => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, AppRoute::Upload.path()))
            .finish()),
    }
}

fn routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.route(CONFIG_PATH, web::get().to(client_config))
        .service(fs::Files::new("/pkg", state.static_dir.join("pkg")))
        .default_service(web::to(spa_entry));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let state = AppState {
        client_config: ClientConfig::new(args.api_base_url),
        static_dir: args.static_dir,
    };

    log::info!("Starting filedrop at http://{}", args.bind);
    log::info!("Static directory: {}", state.static_dir.display());
    log::info!("API base URL: {}", state.client_config.api_base_url);
    if !state.static_dir.join("index.html").exists() {
        log::warn!(
            "{} has no index.html; build the front-end first",
            state.static_dir.display()
        );
    }

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(|cfg| routes(cfg, &state))
    })
    .bind(args.bind.as_str())?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use std::path::Path;

    fn state_for(dir: &Path) -> AppState {
        std::fs::write(dir.join("index.html"), "<html>filedrop</html>").unwrap();
        AppState {
            client_config: ClientConfig::new("http://api.test"),
            static_dir: dir.to_path_buf(),
        }
    }

    #[actix_web::test]
    async fn publishes_client_config() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(|cfg| routes(cfg, &state)),
        )
        .await;

        let req = test::TestRequest::get().uri(CONFIG_PATH).to_request();
        let config: ClientConfig = test::call_and_read_body_json(&app, req).await;
        assert_eq!(config, ClientConfig::new("http://api.test"));
    }

    #[actix_web::test]
    async fn client_routes_serve_the_app_shell() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(|cfg| routes(cfg, &state)),
        )
        .await;

        for route in AppRoute::ALL {
            let req = test::TestRequest::get().uri(route.path()).to_request();
            let body = test::call_and_read_body(&app, req).await;
            assert_eq!(body, "<html>filedrop</html>".as_bytes(), "{:?}", route);
        }
    }

    #[actix_web::test]
    async fn unknown_paths_redirect_to_upload() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(|cfg| routes(cfg, &state)),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin-login").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            AppRoute::Upload.path()
        );
    }
}
