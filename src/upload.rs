//! Upload page orchestration: listing with retry, selection, upload with
//! progress, download and delete.
//!
//! The controller is platform-neutral. The browser build plugs in an HTTP
//! client and the DOM through [`FilesApi`] and [`Browser`]; tests plug in fakes.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::format::progress_percent;
use crate::mime;
use crate::retry::RetryPolicy;
use crate::state::{Store, UploadState};
use crate::{ApiMessage, FileMetadata};

pub const LIST_TIMEOUT: Duration = Duration::from_secs(10);
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(50);
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(10);

/// A file the user picked in the file input.
pub trait SelectedFile: Clone + 'static {
    fn name(&self) -> String;
    fn mime_type(&self) -> String;
}

/// Bytes of a downloaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Called with bytes sent so far and the total, when the total is known.
pub type ProgressFn = Box<dyn Fn(u64, Option<u64>)>;

#[async_trait(?Send)]
pub trait FilesApi: 'static {
    type File: SelectedFile;

    async fn list_files(&self) -> Result<Vec<FileMetadata>, ApiError>;
    async fn upload_file(
        &self,
        file: &Self::File,
        on_progress: ProgressFn,
    ) -> Result<ApiMessage, ApiError>;
    async fn download_file(&self, filename: &str) -> Result<Download, ApiError>;
    async fn delete_file(&self, id: &str) -> Result<ApiMessage, ApiError>;
}

/// The pieces of the host environment the page needs besides HTTP.
#[async_trait(?Send)]
pub trait Browser: 'static {
    type File;

    /// Object URL previewing a selected file.
    fn create_object_url(&self, file: &Self::File) -> Option<String>;
    fn create_blob_url(&self, download: &Download) -> Result<String, ApiError>;
    fn revoke_object_url(&self, url: &str);
    /// Saves the resource behind `url` under `file_name`.
    fn trigger_download(&self, url: &str, file_name: &str) -> Result<(), ApiError>;
    fn confirm(&self, message: &str) -> bool;
    async fn sleep(&self, duration: Duration);
}

pub struct UploadController<A, B, S> {
    api: Rc<A>,
    browser: Rc<B>,
    store: S,
    policy: RetryPolicy,
    alive: Rc<Cell<bool>>,
    generation: Rc<Cell<u64>>,
}

impl<A, B, S: Clone> Clone for UploadController<A, B, S> {
    fn clone(&self) -> Self {
        Self {
            api: Rc::clone(&self.api),
            browser: Rc::clone(&self.browser),
            store: self.store.clone(),
            policy: self.policy,
            alive: Rc::clone(&self.alive),
            generation: Rc::clone(&self.generation),
        }
    }
}

impl<A, B, S> UploadController<A, B, S>
where
    A: FilesApi,
    B: Browser<File = A::File>,
    S: Store<UploadState<A::File>>,
{
    pub fn new(api: Rc<A>, browser: Rc<B>, store: S) -> Self {
        Self::with_policy(api, browser, store, RetryPolicy::default())
    }

    pub fn with_policy(api: Rc<A>, browser: Rc<B>, store: S, policy: RetryPolicy) -> Self {
        Self {
            api,
            browser,
            store,
            policy,
            alive: Rc::new(Cell::new(true)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn update<R>(&self, f: impl FnOnce(&mut UploadState<A::File>) -> R) -> Option<R> {
        if !self.is_alive() {
            return None;
        }
        self.store.update(f)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_alive() && self.generation.get() == generation
    }

    /// Fetches the file list, retrying per the policy. A newer call or
    /// teardown makes this one stop and drop whatever it receives.
    pub async fn load_files(&self) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let mut attempt = 1;
        loop {
            let result = self.api.list_files().await;
            if !self.is_current(generation) {
                log::debug!("discarding stale file list response");
                return;
            }

            let err = match result {
                Ok(files) => {
                    log::info!("loaded {} files", files.len());
                    self.update(|s| {
                        s.files = files;
                        s.error.clear();
                        s.retry_attempt = 0;
                    });
                    return;
                }
                Err(err) => err,
            };

            log::warn!("fetching files failed on attempt {}: {}", attempt, err);
            match self.policy.delay_after(attempt) {
                Some(delay) => {
                    log::info!(
                        "retrying fetch files ({}/{})",
                        attempt + 1,
                        self.policy.max_attempts
                    );
                    self.update(|s| s.retry_attempt = attempt);
                    self.browser.sleep(delay).await;
                    if !self.is_current(generation) {
                        return;
                    }
                    attempt += 1;
                }
                None => {
                    let message = format!(
                        "{}. All {} retries failed. Please try refreshing the page.",
                        err.user_message("Failed to fetch files"),
                        self.policy.max_attempts
                    );
                    self.update(|s| {
                        s.error = message;
                        s.retry_attempt = 0;
                    });
                    return;
                }
            }
        }
    }

    /// Replaces the current selection. The old preview is always released;
    /// a new one is created only for accepted image types.
    pub fn select_file(&self, file: Option<A::File>) {
        if let Some(Some(old)) = self.update(|s| s.preview.take()) {
            self.browser.revoke_object_url(&old);
        }

        match file {
            Some(file) if mime::is_allowed(&file.mime_type()) => {
                let preview = if mime::is_image(&file.mime_type()) {
                    self.browser.create_object_url(&file)
                } else {
                    None
                };
                self.update(|s| {
                    s.file = Some(file);
                    s.preview = preview;
                    s.error.clear();
                });
            }
            Some(file) => {
                log::warn!("rejected {} of type {:?}", file.name(), file.mime_type());
                self.update(|s| {
                    s.file = None;
                    s.error = ApiError::InvalidFileType.to_string();
                });
            }
            None => {
                self.update(|s| s.file = None);
            }
        }
    }

    /// Uploads the selected file. On failure the selection is kept so the
    /// user can try again.
    pub async fn submit(&self) {
        let Some(Some(file)) = self.store.read(|s| s.file.clone()) else {
            self.update(|s| s.error = "Please select a file.".to_string());
            return;
        };
        if self.store.read(|s| s.uploading).unwrap_or(false) {
            return;
        }

        self.update(|s| {
            s.upload_progress = 0;
            s.uploading = true;
            s.message.clear();
            s.error.clear();
        });

        let store = self.store.clone();
        let alive = Rc::clone(&self.alive);
        let on_progress: ProgressFn = Box::new(move |loaded, total| {
            if alive.get() {
                let percent = progress_percent(loaded, total);
                store.update(|s| s.upload_progress = percent);
            }
        });

        match self.api.upload_file(&file, on_progress).await {
            Ok(response) => {
                log::info!("uploaded {}", file.name());
                if let Some(Some(preview)) = self.update(|s| {
                    s.file = None;
                    s.upload_progress = 0;
                    s.uploading = false;
                    s.message = response.message;
                    s.error.clear();
                    s.preview.take()
                }) {
                    self.browser.revoke_object_url(&preview);
                }
                self.load_files().await;
            }
            Err(err) => {
                log::error!("upload of {} failed: {}", file.name(), err);
                self.update(|s| {
                    s.error = err.user_message("Failed to upload file. Please try again.");
                    s.upload_progress = 0;
                    s.uploading = false;
                });
            }
        }
    }

    /// Fetches a stored file and hands it to the browser as a download named
    /// `display_name`. The blob URL is revoked right after the download starts.
    pub async fn download(&self, filename: &str, display_name: &str) {
        log::info!("initiating download for {}", filename);
        let result = match self.api.download_file(filename).await {
            Ok(download) => self.save(&download, display_name),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                self.update(|s| s.error.clear());
            }
            Err(err) => {
                log::error!("download of {} failed: {}", filename, err);
                let message = err.server_message().map(str::to_string).unwrap_or_else(|| {
                    let status = err
                        .status()
                        .map(|status| status.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    format!(
                        "Failed to download file: {}. It may no longer be available. Status: {}.",
                        display_name, status
                    )
                });
                self.update(|s| s.error = message);
            }
        }
    }

    fn save(&self, download: &Download, display_name: &str) -> Result<(), ApiError> {
        let url = self.browser.create_blob_url(download)?;
        let triggered = self.browser.trigger_download(&url, display_name);
        self.browser.revoke_object_url(&url);
        triggered
    }

    /// Deletes a file after the user confirms. Returns whether a request was sent.
    pub async fn delete(&self, id: &str, display_name: &str) -> bool {
        let question = format!(
            "Are you sure you want to permanently delete \"{}\"?",
            display_name
        );
        if !self.browser.confirm(&question) {
            return false;
        }

        match self.api.delete_file(id).await {
            Ok(_) => {
                log::info!("deleted {}", id);
                self.update(|s| {
                    s.files.retain(|file| file.id != id);
                    s.message = format!("File \"{}\" deleted successfully.", display_name);
                    s.error.clear();
                });
                // The refetch replaces the optimistic list when it lands.
                self.load_files().await;
            }
            Err(err) => {
                log::error!("delete of {} failed: {}", id, err);
                let fallback = format!("Failed to delete file: {}. Please try again.", display_name);
                self.update(|s| s.error = err.user_message(&fallback));
            }
        }
        true
    }

    /// Stops pending retries and releases the preview. Later responses are ignored.
    pub fn teardown(&self) {
        if let Some(Some(preview)) = self.update(|s| s.preview.take()) {
            self.browser.revoke_object_url(&preview);
        }
        self.alive.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    #[derive(Debug, Clone, PartialEq)]
    struct FakeFile {
        name: String,
        mime: String,
    }

    impl FakeFile {
        fn new(name: &str, mime: &str) -> Self {
            Self {
                name: name.to_string(),
                mime: mime.to_string(),
            }
        }
    }

    impl SelectedFile for FakeFile {
        fn name(&self) -> String {
            self.name.clone()
        }

        fn mime_type(&self) -> String {
            self.mime.clone()
        }
    }

    type ListResult = Result<Vec<FileMetadata>, ApiError>;

    enum Listing {
        Ready(ListResult),
        Wait {
            started: oneshot::Sender<()>,
            result: oneshot::Receiver<ListResult>,
        },
    }

    #[derive(Default)]
    struct FakeApi {
        listings: RefCell<VecDeque<Listing>>,
        list_calls: Cell<u32>,
        upload_progress: RefCell<Vec<(u64, Option<u64>)>>,
        after_progress: RefCell<Option<Box<dyn Fn()>>>,
        upload_result: RefCell<Option<Result<ApiMessage, ApiError>>>,
        upload_calls: Cell<u32>,
        download_result: RefCell<Option<Result<Download, ApiError>>>,
        delete_result: RefCell<Option<Result<ApiMessage, ApiError>>>,
        deleted: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn list(&self, result: ListResult) {
            self.listings.borrow_mut().push_back(Listing::Ready(result));
        }
    }

    #[async_trait(?Send)]
    impl FilesApi for FakeApi {
        type File = FakeFile;

        async fn list_files(&self) -> Result<Vec<FileMetadata>, ApiError> {
            self.list_calls.set(self.list_calls.get() + 1);
            let next = self.listings.borrow_mut().pop_front();
            match next {
                Some(Listing::Ready(result)) => result,
                Some(Listing::Wait { started, result }) => {
                    let _ = started.send(());
                    result.await.unwrap_or_else(|_| Err(network("dropped")))
                }
                None => Err(network("no listing queued")),
            }
        }

        async fn upload_file(
            &self,
            _file: &FakeFile,
            on_progress: ProgressFn,
        ) -> Result<ApiMessage, ApiError> {
            self.upload_calls.set(self.upload_calls.get() + 1);
            for (loaded, total) in self.upload_progress.borrow().iter() {
                on_progress(*loaded, *total);
            }
            if let Some(hook) = self.after_progress.borrow().as_ref() {
                hook();
            }
            self.upload_result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(network("no upload result queued")))
        }

        async fn download_file(&self, _filename: &str) -> Result<Download, ApiError> {
            self.download_result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(network("no download queued")))
        }

        async fn delete_file(&self, id: &str) -> Result<ApiMessage, ApiError> {
            self.deleted.borrow_mut().push(id.to_string());
            self.delete_result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(network("no delete result queued")))
        }
    }

    #[derive(Default)]
    struct FakeBrowser {
        next_url: Cell<u32>,
        created: RefCell<Vec<String>>,
        revoked: RefCell<Vec<String>>,
        downloads: RefCell<Vec<(String, String)>>,
        confirm_answer: Cell<bool>,
        confirm_calls: Cell<u32>,
        sleeps: RefCell<Vec<Duration>>,
        on_sleep: RefCell<Option<Box<dyn Fn()>>>,
    }

    impl FakeBrowser {
        fn url(&self, prefix: &str) -> String {
            let n = self.next_url.get() + 1;
            self.next_url.set(n);
            let url = format!("{}:{}", prefix, n);
            self.created.borrow_mut().push(url.clone());
            url
        }
    }

    #[async_trait(?Send)]
    impl Browser for FakeBrowser {
        type File = FakeFile;

        fn create_object_url(&self, _file: &FakeFile) -> Option<String> {
            Some(self.url("blob:preview"))
        }

        fn create_blob_url(&self, _download: &Download) -> Result<String, ApiError> {
            Ok(self.url("blob:download"))
        }

        fn revoke_object_url(&self, url: &str) {
            self.revoked.borrow_mut().push(url.to_string());
        }

        fn trigger_download(&self, url: &str, file_name: &str) -> Result<(), ApiError> {
            self.downloads
                .borrow_mut()
                .push((url.to_string(), file_name.to_string()));
            Ok(())
        }

        fn confirm(&self, _message: &str) -> bool {
            self.confirm_calls.set(self.confirm_calls.get() + 1);
            self.confirm_answer.get()
        }

        async fn sleep(&self, duration: Duration) {
            self.sleeps.borrow_mut().push(duration);
            if let Some(hook) = self.on_sleep.borrow().as_ref() {
                hook();
            }
        }
    }

    type TestStore = Rc<RefCell<UploadState<FakeFile>>>;
    type TestController = UploadController<FakeApi, FakeBrowser, TestStore>;

    fn network(msg: &str) -> ApiError {
        ApiError::Network(msg.to_string())
    }

    fn meta(id: &str, mime_type: &str) -> FileMetadata {
        FileMetadata {
            id: id.to_string(),
            filename: format!("stored-{}", id),
            original_name: format!("{}.bin", id),
            mime_type: mime_type.to_string(),
            path: format!("uploads/stored-{}", id),
            size: 10,
            upload_date: "2025-01-06T10:00:00Z".to_string(),
        }
    }

    fn setup() -> (TestController, Rc<FakeApi>, Rc<FakeBrowser>, TestStore) {
        let api = Rc::new(FakeApi::default());
        let browser = Rc::new(FakeBrowser::default());
        let store: TestStore = Rc::new(RefCell::new(UploadState::default()));
        let controller =
            UploadController::new(Rc::clone(&api), Rc::clone(&browser), Rc::clone(&store));
        (controller, api, browser, store)
    }

    fn ids(store: &TestStore) -> Vec<String> {
        store.borrow().files.iter().map(|f| f.id.clone()).collect()
    }

    #[tokio::test]
    async fn load_files_replaces_list_and_clears_error() {
        let (controller, api, browser, store) = setup();
        store.borrow_mut().error = "old".to_string();
        api.list(Ok(vec![meta("a", "image/png"), meta("b", "application/pdf")]));

        controller.load_files().await;

        assert_eq!(ids(&store), vec!["a", "b"]);
        assert!(store.borrow().error.is_empty());
        assert_eq!(api.list_calls.get(), 1);
        assert!(browser.sleeps.borrow().is_empty());
    }

    #[tokio::test]
    async fn three_failures_end_in_terminal_error() {
        let (controller, api, browser, store) = setup();
        for _ in 0..3 {
            api.list(Err(network("connection refused")));
        }

        controller.load_files().await;

        assert_eq!(api.list_calls.get(), 3);
        assert_eq!(
            *browser.sleeps.borrow(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
        let state = store.borrow();
        assert_eq!(
            state.error,
            "Failed to fetch files. All 3 retries failed. Please try refreshing the page."
        );
        assert_eq!(state.retry_attempt, 0);
    }

    #[tokio::test]
    async fn terminal_error_prefers_server_message() {
        let (controller, api, _browser, store) = setup();
        for _ in 0..3 {
            api.list(Err(ApiError::server(503, "Database offline")));
        }

        controller.load_files().await;

        assert!(store.borrow().error.starts_with("Database offline. All 3 retries"));
    }

    #[tokio::test]
    async fn success_on_second_attempt_stops_retrying() {
        let (controller, api, browser, store) = setup();
        store.borrow_mut().error = "stale error".to_string();
        api.list(Err(network("timeout")));
        api.list(Ok(vec![meta("a", "video/mp4")]));
        api.list(Err(network("must not be reached")));

        controller.load_files().await;

        assert_eq!(api.list_calls.get(), 2);
        assert_eq!(*browser.sleeps.borrow(), vec![Duration::from_secs(2)]);
        assert_eq!(ids(&store), vec!["a"]);
        assert!(store.borrow().error.is_empty());
        assert_eq!(store.borrow().retry_attempt, 0);
    }

    #[tokio::test]
    async fn pending_retry_reports_attempt() {
        let (controller, api, browser, store) = setup();
        api.list(Err(network("timeout")));
        api.list(Ok(vec![]));
        let seen = Rc::new(Cell::new(0));
        let probe_store = Rc::clone(&store);
        let probe = Rc::clone(&seen);
        *browser.on_sleep.borrow_mut() = Some(Box::new(move || {
            probe.set(probe_store.borrow().retry_attempt);
        }));

        controller.load_files().await;

        assert_eq!(seen.get(), 1);
        assert_eq!(store.borrow().retry_attempt, 0);
    }

    #[tokio::test]
    async fn retry_timer_is_a_no_op_after_teardown() {
        let (controller, api, browser, store) = setup();
        api.list(Err(network("timeout")));
        api.list(Ok(vec![meta("late", "image/png")]));
        let teardown = controller.clone();
        *browser.on_sleep.borrow_mut() = Some(Box::new(move || teardown.teardown()));

        controller.load_files().await;

        assert_eq!(api.list_calls.get(), 1);
        assert!(store.borrow().files.is_empty());
        assert!(!controller.is_alive());
    }

    #[tokio::test]
    async fn stale_list_response_is_discarded() {
        let (controller, api, _browser, store) = setup();
        let (started_tx, started_rx) = oneshot::channel();
        let (result_tx, result_rx) = oneshot::channel();
        api.listings.borrow_mut().push_back(Listing::Wait {
            started: started_tx,
            result: result_rx,
        });
        api.list(Ok(vec![meta("fresh", "image/png")]));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let slow = controller.clone();
                let first = tokio::task::spawn_local(async move { slow.load_files().await });
                started_rx.await.unwrap();

                controller.load_files().await;
                result_tx.send(Ok(vec![meta("old", "image/png")])).unwrap();
                first.await.unwrap();
            })
            .await;

        assert_eq!(ids(&store), vec!["fresh"]);
    }

    #[test]
    fn disallowed_types_clear_selection() {
        let (controller, _api, browser, store) = setup();
        for mime in ["application/zip", "image/webp", "text/html", ""] {
            controller.select_file(Some(FakeFile::new("cat.png", "image/png")));
            controller.select_file(Some(FakeFile::new("bad", mime)));

            let state = store.borrow();
            assert!(state.file.is_none(), "{} should be rejected", mime);
            assert!(state.preview.is_none());
            assert!(state.error.starts_with("Invalid file type"));
        }
        assert_eq!(browser.created.borrow().len(), browser.revoked.borrow().len());
    }

    #[test]
    fn images_get_a_preview_and_others_do_not() {
        let (controller, _api, _browser, store) = setup();
        for mime in ["image/jpeg", "image/png", "image/gif"] {
            controller.select_file(Some(FakeFile::new("pic", mime)));
            assert!(store.borrow().preview.is_some(), "{} should preview", mime);
        }

        for mime in ["application/pdf", "text/plain", "video/mp4", "audio/ogg"] {
            controller.select_file(Some(FakeFile::new("doc", mime)));
            let state = store.borrow();
            assert!(state.preview.is_none(), "{} should not preview", mime);
            assert_eq!(state.file.as_ref().map(|f| f.mime.as_str()), Some(mime));
            assert!(state.error.is_empty());
        }
    }

    #[test]
    fn replacing_a_selection_revokes_the_old_preview_once() {
        let (controller, _api, browser, store) = setup();
        controller.select_file(Some(FakeFile::new("a.png", "image/png")));
        let first = store.borrow().preview.clone().unwrap();

        controller.select_file(Some(FakeFile::new("b.gif", "image/gif")));
        assert_eq!(*browser.revoked.borrow(), vec![first.clone()]);

        controller.select_file(Some(FakeFile::new("c.pdf", "application/pdf")));
        let second = browser.created.borrow()[1].clone();
        assert_eq!(*browser.revoked.borrow(), vec![first, second]);

        controller.select_file(None);
        assert_eq!(browser.revoked.borrow().len(), 2);
        assert!(store.borrow().file.is_none());
    }

    #[test]
    fn teardown_releases_preview() {
        let (controller, _api, browser, store) = setup();
        controller.select_file(Some(FakeFile::new("a.png", "image/png")));
        let preview = store.borrow().preview.clone().unwrap();

        controller.teardown();

        assert_eq!(*browser.revoked.borrow(), vec![preview]);
        assert!(store.borrow().preview.is_none());
    }

    #[tokio::test]
    async fn submit_without_file_is_a_validation_error() {
        let (controller, api, _browser, store) = setup();

        controller.submit().await;

        assert_eq!(store.borrow().error, "Please select a file.");
        assert_eq!(api.upload_calls.get(), 0);
    }

    #[tokio::test]
    async fn upload_progress_is_reported_as_percent() {
        let (controller, api, _browser, store) = setup();
        controller.select_file(Some(FakeFile::new("clip.mp4", "video/mp4")));
        api.upload_progress.borrow_mut().push((50, Some(200)));
        *api.upload_result.borrow_mut() = Some(Err(network("stop here")));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let probe = Rc::clone(&seen);
        let probe_store = Rc::clone(&store);
        *api.after_progress.borrow_mut() = Some(Box::new(move || {
            let state = probe_store.borrow();
            probe.borrow_mut().push((state.upload_progress, state.uploading));
        }));

        controller.submit().await;

        assert_eq!(*seen.borrow(), vec![(25, true)]);
        assert_eq!(store.borrow().upload_progress, 0);
    }

    #[tokio::test]
    async fn unknown_total_reports_zero_progress() {
        let (controller, api, _browser, store) = setup();
        controller.select_file(Some(FakeFile::new("song.ogg", "audio/ogg")));
        api.upload_progress.borrow_mut().push((4096, None));
        *api.upload_result.borrow_mut() = Some(Err(network("stop here")));

        let seen = Rc::new(Cell::new(u8::MAX));
        let probe = Rc::clone(&seen);
        let probe_store = Rc::clone(&store);
        *api.after_progress.borrow_mut() = Some(Box::new(move || {
            probe.set(probe_store.borrow().upload_progress);
        }));

        controller.submit().await;

        assert_eq!(seen.get(), 0);
    }

    #[tokio::test]
    async fn successful_upload_clears_selection_and_refreshes() {
        let (controller, api, browser, store) = setup();
        controller.select_file(Some(FakeFile::new("cat.png", "image/png")));
        let preview = store.borrow().preview.clone().unwrap();
        api.upload_progress.borrow_mut().push((100, Some(100)));
        *api.upload_result.borrow_mut() = Some(Ok(ApiMessage {
            message: "File uploaded successfully".to_string(),
        }));
        api.list(Ok(vec![meta("cat", "image/png")]));

        controller.submit().await;

        let state = store.borrow();
        assert!(state.file.is_none());
        assert!(state.preview.is_none());
        assert_eq!(state.upload_progress, 0);
        assert!(!state.uploading);
        assert_eq!(state.message, "File uploaded successfully");
        assert_eq!(ids(&store), vec!["cat"]);
        assert_eq!(*browser.revoked.borrow(), vec![preview]);
        assert_eq!(api.list_calls.get(), 1);
    }

    #[tokio::test]
    async fn failed_upload_keeps_the_file() {
        let (controller, api, _browser, store) = setup();
        controller.select_file(Some(FakeFile::new("notes.txt", "text/plain")));
        api.upload_progress.borrow_mut().push((10, Some(20)));
        *api.upload_result.borrow_mut() = Some(Err(ApiError::server(413, "File too large")));

        controller.submit().await;

        let state = store.borrow();
        assert_eq!(state.file, Some(FakeFile::new("notes.txt", "text/plain")));
        assert_eq!(state.error, "File too large");
        assert_eq!(state.upload_progress, 0);
        assert!(!state.uploading);
        assert_eq!(api.list_calls.get(), 0);
    }

    #[tokio::test]
    async fn failed_upload_without_server_message_uses_fallback() {
        let (controller, api, _browser, store) = setup();
        controller.select_file(Some(FakeFile::new("notes.txt", "text/plain")));
        *api.upload_result.borrow_mut() = Some(Err(network("timeout")));

        controller.submit().await;

        assert_eq!(
            store.borrow().error,
            "Failed to upload file. Please try again."
        );
    }

    #[tokio::test]
    async fn download_triggers_and_revokes_blob_url() {
        let (controller, api, browser, store) = setup();
        store.borrow_mut().error = "previous".to_string();
        *api.download_result.borrow_mut() = Some(Ok(Download {
            bytes: vec![1, 2, 3],
            content_type: Some("application/pdf".to_string()),
        }));

        controller.download("stored-report", "report.pdf").await;

        let downloads = browser.downloads.borrow();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].1, "report.pdf");
        assert_eq!(*browser.revoked.borrow(), vec![downloads[0].0.clone()]);
        assert!(store.borrow().error.is_empty());
    }

    #[tokio::test]
    async fn download_failure_names_file_and_status() {
        let (controller, api, browser, store) = setup();
        *api.download_result.borrow_mut() = Some(Err(ApiError::server(404, "")));

        controller.download("stored-report", "report.pdf").await;

        assert_eq!(
            store.borrow().error,
            "Failed to download file: report.pdf. It may no longer be available. Status: 404."
        );
        assert!(browser.downloads.borrow().is_empty());

        *api.download_result.borrow_mut() = Some(Err(network("offline")));
        controller.download("stored-report", "report.pdf").await;
        assert!(store.borrow().error.ends_with("Status: unknown."));
    }

    #[tokio::test]
    async fn declined_confirmation_sends_nothing() {
        let (controller, api, browser, store) = setup();
        store.borrow_mut().files = vec![meta("a", "image/png")];
        browser.confirm_answer.set(false);

        let sent = controller.delete("a", "a.png").await;

        assert!(!sent);
        assert_eq!(browser.confirm_calls.get(), 1);
        assert!(api.deleted.borrow().is_empty());
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_row_and_refetch_wins() {
        let (controller, api, browser, store) = setup();
        store.borrow_mut().files = vec![meta("a", "image/png"), meta("b", "audio/wav")];
        browser.confirm_answer.set(true);
        *api.delete_result.borrow_mut() = Some(Ok(ApiMessage::default()));
        // The server still reports "c", which the optimistic list never had.
        api.list(Ok(vec![meta("b", "audio/wav"), meta("c", "video/avi")]));

        let sent = controller.delete("a", "a.png").await;

        assert!(sent);
        assert_eq!(*api.deleted.borrow(), vec!["a".to_string()]);
        assert_eq!(ids(&store), vec!["b", "c"]);
        assert_eq!(store.borrow().message, "File \"a.png\" deleted successfully.");
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let (controller, api, browser, store) = setup();
        store.borrow_mut().files = vec![meta("a", "image/png")];
        browser.confirm_answer.set(true);
        *api.delete_result.borrow_mut() = Some(Err(network("timeout")));

        controller.delete("a", "a.png").await;

        assert_eq!(ids(&store), vec!["a"]);
        assert_eq!(
            store.borrow().error,
            "Failed to delete file: a.png. Please try again."
        );
        assert_eq!(api.list_calls.get(), 0);
    }
}
