//! Runtime file loading status.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;
use crate::runtime::{EventSubscription, FileRef, RuntimeEvent, RuntimeEventKind};

/// Where a runtime file comes from. At least one field must be set for a
/// load to start.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSource {
    pub src: Option<String>,
    #[serde(skip)]
    pub buffer: Option<Vec<u8>>,
}

impl FileSource {
    pub fn url(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            buffer: None,
        }
    }

    pub fn bytes(buffer: Vec<u8>) -> Self {
        Self {
            src: None,
            buffer: Some(buffer),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_none() && self.buffer.is_none()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Creates runtime files; supplied by the host integration.
pub type FileFactory = Box<dyn Fn(&FileSource) -> Result<FileRef, RuntimeError>>;

struct TrackerInner {
    file: Option<FileRef>,
    status: FileStatus,
    listeners: Vec<EventSubscription>,
    /// Bumped on every load so late events from a replaced file are ignored.
    generation: u64,
}

pub struct FileTracker {
    factory: FileFactory,
    inner: Rc<RefCell<TrackerInner>>,
}

impl FileTracker {
    pub fn new(factory: impl Fn(&FileSource) -> Result<FileRef, RuntimeError> + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            inner: Rc::new(RefCell::new(TrackerInner {
                file: None,
                status: FileStatus::Idle,
                listeners: Vec::new(),
                generation: 0,
            })),
        }
    }

    /// Release the current file and start loading `source`.
    pub fn load(&self, source: &FileSource) -> FileStatus {
        let generation = self.release();
        if source.is_empty() {
            self.inner.borrow_mut().status = FileStatus::Idle;
            return FileStatus::Idle;
        }

        self.inner.borrow_mut().status = FileStatus::Loading;
        let file = match (self.factory)(source) {
            Ok(file) => file,
            Err(err) => {
                log::error!("error creating runtime file: {err}");
                self.inner.borrow_mut().status = FileStatus::Failed;
                return FileStatus::Failed;
            }
        };

        let weak = Rc::downgrade(&self.inner);
        let on_load = EventSubscription::listen(
            &file,
            RuntimeEventKind::Load,
            Rc::new(move |_: &RuntimeEvent| {
                let Some(inner) = weak.upgrade() else { return };
                let file = {
                    let inner = inner.borrow();
                    if inner.generation != generation {
                        return;
                    }
                    inner.file.clone()
                };
                // keep the file alive while it is tracked
                if let Some(file) = file {
                    file.acquire_instance();
                }
                inner.borrow_mut().status = FileStatus::Success;
            }),
        );
        let weak = Rc::downgrade(&self.inner);
        let on_error = EventSubscription::listen(
            &file,
            RuntimeEventKind::LoadError,
            Rc::new(move |event: &RuntimeEvent| {
                let Some(inner) = weak.upgrade() else { return };
                let mut inner = inner.borrow_mut();
                if inner.generation == generation {
                    if let RuntimeEvent::LoadError(reason) = event {
                        log::error!("runtime file load error: {reason}");
                    }
                    inner.status = FileStatus::Failed;
                }
            }),
        );

        {
            let mut inner = self.inner.borrow_mut();
            inner.file = Some(file.clone());
            inner.listeners = vec![on_load, on_error];
        }

        if let Err(err) = file.init() {
            log::error!("error initialising runtime file: {err}");
            self.inner.borrow_mut().status = FileStatus::Failed;
        }
        self.status()
    }

    pub fn status(&self) -> FileStatus {
        self.inner.borrow().status
    }

    /// The tracked file; present from the start of loading.
    pub fn file(&self) -> Option<FileRef> {
        self.inner.borrow().file.clone()
    }

    pub fn dispose(&self) {
        self.release();
        self.inner.borrow_mut().status = FileStatus::Idle;
    }

    /// Drop listeners, clean the current file up and start a new generation.
    fn release(&self) -> u64 {
        let (file, listeners, generation) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            (
                inner.file.take(),
                std::mem::take(&mut inner.listeners),
                inner.generation,
            )
        };
        drop(listeners);
        if let Some(file) = file {
            file.cleanup();
        }
        generation
    }
}

impl Drop for FileTracker {
    fn drop(&mut self) {
        self.release();
    }
}
