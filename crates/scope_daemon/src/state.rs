use crate::store::RecordStore;
use parking_lot::RwLock;
use scope_content::FactorContent;
use std::sync::Arc;

pub type SharedStore = Arc<RwLock<RecordStore>>;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub content: Arc<FactorContent>,
}

impl AppState {
    pub fn new(content: FactorContent) -> Self {
        Self {
            store: Arc::new(RwLock::new(RecordStore::default())),
            content: Arc::new(content),
        }
    }
}
