mod browser;
mod forms;
mod http;
mod logging;
mod pages;
mod styles;
mod upload_page;

use std::rc::Rc;

use gloo_net::http::Request;
use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::*;
use log::LevelFilter;
use wasm_bindgen::prelude::*;

use crate::auth::Session;
use crate::ClientConfig;

pub use browser::{WebBrowser, WebFile};
pub use http::HttpApi;

use forms::AuthGate;
use pages::{About, Contact, Home};
use styles::StyleProvider;
use upload_page::UploadPage;

/// The signal holding the logged-in user, shared through context.
pub type SessionSignal = RwSignal<Option<Session>>;

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_meta_context();
    provide_context(Rc::new(HttpApi::new(config)));
    provide_context::<SessionSignal>(create_rw_signal(None));

    view! {
        <Title formatter=|page: String| format!("{} | Amanuel's Portfolio", page) />
        <StyleProvider />
        <Router>
            <Routes>
                <Route path="/" view=AuthGate />
                <Route path="/home" view=Home />
                <Route path="/about" view=About />
                <Route path="/contact" view=Contact />
                <Route path="/upload" view=UploadPage />
            </Routes>
        </Router>
    }
}

/// Asks the shell host where the API lives. Falls back to the base baked in
/// at build time, then to the page's own origin.
async fn load_config() -> ClientConfig {
    let fetched = match Request::get("/config").send().await {
        Ok(response) if response.ok() => response.json::<ClientConfig>().await.ok(),
        Ok(response) => {
            log::warn!("config request returned status {}", response.status());
            None
        }
        Err(err) => {
            log::warn!("config request failed: {}", err);
            None
        }
    };

    fetched.unwrap_or_else(|| ClientConfig {
        api_base_url: option_env!("FOLIO_API_URL").unwrap_or_default().to_string(),
    })
}

#[wasm_bindgen]
pub fn run() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Info);

    spawn_local(async {
        let config = load_config().await;
        log::info!("using api base {:?}", config.api_base_url);
        mount_to_body(move || view! { <App config=config /> });
    });
}
