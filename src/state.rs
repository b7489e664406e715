use std::cell::RefCell;
use std::rc::Rc;

use crate::mime::FileCategory;
use crate::FileMetadata;

/// A single-threaded cell of page state. Reactive signals implement it in the
/// browser build; tests use `Rc<RefCell<_>>`.
///
/// Both methods return `None` when the underlying storage has been disposed,
/// which happens to signals once their page unmounts.
pub trait Store<T>: Clone + 'static {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>;
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;
}

impl<T: 'static> Store<T> for Rc<RefCell<T>> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }

    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

#[cfg(feature = "frontend")]
impl<T: 'static> Store<T> for leptos::RwSignal<T> {
    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        use leptos::SignalWithUntracked;
        self.try_with_untracked(f)
    }

    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        use leptos::SignalUpdate;
        self.try_update(f)
    }
}

/// Everything the upload page shows. `F` is the platform's handle for a
/// user-selected file.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadState<F> {
    pub file: Option<F>,
    /// Object URL of the selected image; `None` for every other selection.
    pub preview: Option<String>,
    /// 0..=100, 0 while idle.
    pub upload_progress: u8,
    pub uploading: bool,
    pub message: String,
    pub error: String,
    pub files: Vec<FileMetadata>,
    /// Failed list-fetch attempt a retry is waiting on, 0 when none is pending.
    pub retry_attempt: u32,
}

impl<F> Default for UploadState<F> {
    fn default() -> Self {
        Self {
            file: None,
            preview: None,
            upload_progress: 0,
            uploading: false,
            message: String::new(),
            error: String::new(),
            files: Vec::new(),
            retry_attempt: 0,
        }
    }
}

impl<F> UploadState<F> {
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.uploading
    }
}

/// Which category sections are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionState {
    pub images: bool,
    pub videos: bool,
    pub audio: bool,
    pub documents: bool,
}

impl Default for AccordionState {
    fn default() -> Self {
        Self {
            images: true,
            videos: false,
            audio: false,
            documents: false,
        }
    }
}

impl AccordionState {
    pub fn is_open(&self, category: FileCategory) -> bool {
        match category {
            FileCategory::Image => self.images,
            FileCategory::Video => self.videos,
            FileCategory::Audio => self.audio,
            FileCategory::Document => self.documents,
        }
    }

    pub fn toggle(&mut self, category: FileCategory) {
        let open = match category {
            FileCategory::Image => &mut self.images,
            FileCategory::Video => &mut self.videos,
            FileCategory::Audio => &mut self.audio,
            FileCategory::Document => &mut self.documents,
        };
        *open = !*open;
    }
}
