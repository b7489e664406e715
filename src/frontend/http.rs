use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use gloo_net::http::{Request, Response};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AbortController, AbortSignal, FormData, ProgressEvent, XmlHttpRequest};

use crate::auth::AuthApi;
use crate::error::{message_from_body, ApiError};
use crate::upload::{
    Download, FilesApi, ProgressFn, SelectedFile, DELETE_TIMEOUT, DOWNLOAD_TIMEOUT, LIST_TIMEOUT,
    UPLOAD_TIMEOUT,
};
use crate::{
    encode_path_segment, ApiMessage, ClientConfig, FileMetadata, LoginRequest, LoginResponse,
    SignupRequest,
};

use super::browser::WebFile;

const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the portfolio backend.
pub struct HttpApi {
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Aborts the request it is attached to once the timeout passes. Dropping it
/// cancels the timer.
struct Deadline {
    signal: AbortSignal,
    _timer: Timeout,
}

impl Deadline {
    fn start(timeout: Duration) -> Result<Self, ApiError> {
        let controller = AbortController::new().map_err(network_js)?;
        let signal = controller.signal();
        let timer = Timeout::new(timeout.as_millis() as u32, move || controller.abort());
        Ok(Self {
            signal,
            _timer: timer,
        })
    }
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn network_js(value: JsValue) -> ApiError {
    ApiError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::server(status, message_from_body(&body)))
}

/// Reads a `{message}` body, tolerating an empty or non-JSON one.
async fn read_message(response: Response) -> ApiMessage {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str(&body).unwrap_or_default()
}

#[async_trait(?Send)]
impl FilesApi for HttpApi {
    type File = WebFile;

    async fn list_files(&self) -> Result<Vec<FileMetadata>, ApiError> {
        let deadline = Deadline::start(LIST_TIMEOUT)?;
        let response = Request::get(&self.config.api_url("files"))
            .abort_signal(Some(&deadline.signal))
            .send()
            .await
            .map_err(network)?;
        let response = ensure_success(response).await?;
        response.json::<Vec<FileMetadata>>().await.map_err(network)
    }

    /// Sent through `XMLHttpRequest` because fetch has no upload progress events.
    async fn upload_file(&self, file: &WebFile, report: ProgressFn) -> Result<ApiMessage, ApiError> {
        let form = FormData::new().map_err(network_js)?;
        form.append_with_blob_and_filename("file", file.raw(), &file.name())
            .map_err(network_js)?;

        let xhr = XmlHttpRequest::new().map_err(network_js)?;
        xhr.open_with_async("POST", &self.config.api_url("upload"), true)
            .map_err(network_js)?;
        xhr.set_timeout(UPLOAD_TIMEOUT.as_millis() as u32);

        let (tx, rx) = oneshot::channel::<Result<(), ApiError>>();
        let tx = RefCell::new(Some(tx));
        let finish: Rc<dyn Fn(Result<(), ApiError>)> = Rc::new(move |outcome| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(outcome);
            }
        });

        let on_load = {
            let finish = Rc::clone(&finish);
            Closure::<dyn FnMut()>::new(move || finish(Ok(())))
        };
        let on_error = {
            let finish = Rc::clone(&finish);
            Closure::<dyn FnMut()>::new(move || {
                finish(Err(ApiError::Network("upload request failed".to_string())))
            })
        };
        let on_timeout = {
            let finish = Rc::clone(&finish);
            Closure::<dyn FnMut()>::new(move || {
                finish(Err(ApiError::Network("upload timed out".to_string())))
            })
        };
        let on_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            let total = event.length_computable().then(|| event.total() as u64);
            report(event.loaded() as u64, total);
        });

        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        xhr.set_ontimeout(Some(on_timeout.as_ref().unchecked_ref()));
        xhr.upload()
            .map_err(network_js)?
            .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

        // Declared after the closures so it drops first and detaches them.
        let _in_flight = InFlight(xhr.clone());
        xhr.send_with_opt_form_data(Some(&form)).map_err(network_js)?;

        rx.await
            .map_err(|_| ApiError::Network("upload was cancelled".to_string()))??;

        let status = xhr.status().map_err(network_js)?;
        let body = xhr.response_text().map_err(network_js)?.unwrap_or_default();
        if (200..300).contains(&status) {
            Ok(serde_json::from_str(&body).unwrap_or_default())
        } else {
            Err(ApiError::server(status, message_from_body(&body)))
        }
    }

    async fn download_file(&self, filename: &str) -> Result<Download, ApiError> {
        let deadline = Deadline::start(DOWNLOAD_TIMEOUT)?;
        let url = self
            .config
            .api_url(&format!("download/{}", encode_path_segment(filename)));
        let response = Request::get(&url)
            .abort_signal(Some(&deadline.signal))
            .send()
            .await
            .map_err(network)?;
        let response = ensure_success(response).await?;
        let content_type = response.headers().get("content-type");
        log::info!(
            "download response status: {}, content type: {:?}",
            response.status(),
            content_type
        );
        let bytes = response.binary().await.map_err(network)?;
        Ok(Download {
            bytes,
            content_type,
        })
    }

    async fn delete_file(&self, id: &str) -> Result<ApiMessage, ApiError> {
        let deadline = Deadline::start(DELETE_TIMEOUT)?;
        let url = self
            .config
            .api_url(&format!("files/{}", encode_path_segment(id)));
        let response = Request::delete(&url)
            .abort_signal(Some(&deadline.signal))
            .send()
            .await
            .map_err(network)?;
        let response = ensure_success(response).await?;
        Ok(read_message(response).await)
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let deadline = Deadline::start(AUTH_TIMEOUT)?;
        let response = Request::post(&self.config.api_url("login"))
            .abort_signal(Some(&deadline.signal))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(network)?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<ApiMessage, ApiError> {
        let deadline = Deadline::start(AUTH_TIMEOUT)?;
        let response = Request::post(&self.config.api_url("signin"))
            .abort_signal(Some(&deadline.signal))
            .json(request)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        let response = ensure_success(response).await?;
        Ok(read_message(response).await)
    }
}

/// Aborts an unfinished XHR and unhooks its handlers when the upload future
/// goes away, so the browser never calls a dropped closure.
struct InFlight(XmlHttpRequest);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.set_onload(None);
        self.0.set_onerror(None);
        self.0.set_ontimeout(None);
        if let Ok(upload) = self.0.upload() {
            upload.set_onprogress(None);
        }
        let _ = self.0.abort();
    }
}
