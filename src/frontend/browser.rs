use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use gloo_file::{Blob, ObjectUrl};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlAnchorElement;

use crate::error::ApiError;
use crate::upload::{Browser, Download, SelectedFile};

/// A file picked in the upload form's file input.
#[derive(Debug, Clone, PartialEq)]
pub struct WebFile(web_sys::File);

impl WebFile {
    pub fn new(file: web_sys::File) -> Self {
        Self(file)
    }

    pub fn raw(&self) -> &web_sys::File {
        &self.0
    }
}

impl SelectedFile for WebFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }
}

/// DOM-backed [`Browser`]. Object URLs live in a registry and are revoked
/// when removed from it, or all at once when this value is dropped.
#[derive(Default)]
pub struct WebBrowser {
    urls: RefCell<HashMap<String, ObjectUrl>>,
}

impl WebBrowser {
    fn keep(&self, url: ObjectUrl) -> String {
        let key = url.to_string();
        self.urls.borrow_mut().insert(key.clone(), url);
        key
    }
}

fn browser_js(value: JsValue) -> ApiError {
    ApiError::Browser(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

#[async_trait(?Send)]
impl Browser for WebBrowser {
    type File = WebFile;

    fn create_object_url(&self, file: &WebFile) -> Option<String> {
        let blob = Blob::from(web_sys::Blob::from(file.raw().clone()));
        Some(self.keep(ObjectUrl::from(blob)))
    }

    fn create_blob_url(&self, download: &Download) -> Result<String, ApiError> {
        let blob = Blob::new_with_options(
            download.bytes.as_slice(),
            download.content_type.as_deref(),
        );
        Ok(self.keep(ObjectUrl::from(blob)))
    }

    fn revoke_object_url(&self, url: &str) {
        if self.urls.borrow_mut().remove(url).is_none() {
            log::debug!("object url {} was already released", url);
        }
    }

    fn trigger_download(&self, url: &str, file_name: &str) -> Result<(), ApiError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ApiError::Browser("no document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| ApiError::Browser("no document body".to_string()))?;

        let link: HtmlAnchorElement = document
            .create_element("a")
            .map_err(browser_js)?
            .dyn_into()
            .map_err(|_| ApiError::Browser("created element is not an anchor".to_string()))?;
        link.set_href(url);
        link.set_download(file_name);

        body.append_child(&link).map_err(browser_js)?;
        link.click();
        body.remove_child(&link).map_err(browser_js)?;
        Ok(())
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(duration.as_millis() as u32).await;
    }
}
