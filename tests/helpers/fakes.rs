use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use ticketdesk::domain::entities::StoredObject;
use ticketdesk::domain::ports::notification_dispatcher::{NotificationDispatcher, StatusChangeNotice};
use ticketdesk::domain::ports::object_storage::ObjectStorage;
use ticketdesk::domain::ports::task_spawner::TaskSpawner;
use ticketdesk::{ApiError, ApiResult};
use tokio::task::JoinHandle;

/// Records every notice; optionally fails each delivery after recording it
#[derive(Default)]
pub struct RecordingDispatcher {
    notices: Mutex<Vec<StatusChangeNotice>>,
    fail: bool,
}

impl RecordingDispatcher {
    pub fn failing() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn notices(&self) -> Vec<StatusChangeNotice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn notify_status_change(&self, notice: &StatusChangeNotice) -> Result<(), String> {
        self.notices.lock().unwrap().push(notice.clone());
        if self.fail {
            Err("smtp relay unreachable".to_string())
        } else {
            Ok(())
        }
    }
}

/// Spawns on tokio and keeps the handles so a test can wait for background work
#[derive(Default)]
pub struct RecordingTaskSpawner {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl RecordingTaskSpawner {
    pub fn spawned(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    pub async fn wait_all(&self) {
        let handles: Vec<JoinHandle<()>> = self.handles.lock().unwrap().drain(..).collect();
        for handle in handles {
            handle.await.expect("background task panicked");
        }
    }
}

impl TaskSpawner for RecordingTaskSpawner {
    fn spawn(&self, future: BoxFuture<'static, ()>) {
        let handle = tokio::spawn(future);
        self.handles.lock().unwrap().push(handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBehavior {
    Succeed,
    Fail,
    EmptyUrl,
}

/// In-memory object store with a switchable failure mode
pub struct FakeStorage {
    behavior: StorageBehavior,
    uploads: Mutex<Vec<String>>,
    deletes: AtomicUsize,
}

impl FakeStorage {
    pub fn new(behavior: StorageBehavior) -> Self {
        Self {
            behavior,
            uploads: Mutex::new(Vec::new()),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(
        &self,
        _data: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> ApiResult<StoredObject> {
        if self.behavior == StorageBehavior::Fail {
            return Err(ApiError::UploadFailed("bucket unavailable".to_string()));
        }

        let storage_id = format!("obj-{}", self.uploads.lock().unwrap().len() + 1);
        self.uploads.lock().unwrap().push(file_name.to_string());
        let url = match self.behavior {
            StorageBehavior::EmptyUrl => String::new(),
            _ => format!("https://files.example.com/{}", storage_id),
        };
        Ok(StoredObject {
            url,
            mime_type: mime_type.to_string(),
            storage_id,
            file_name: file_name.to_string(),
        })
    }

    async fn delete(&self, _storage_id: &str) -> bool {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        true
    }
}
