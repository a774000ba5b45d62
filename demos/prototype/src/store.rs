use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub strength: u32,
    pub session_data: Option<String>,
}

pub trait Store: Send + Sync {
    fn fetch(&self, id: &str) -> Option<User>;
}

pub type DynStore = Arc<dyn Store>;

pub struct MemoryStore {
    mem: Vec<User>,
}

impl MemoryStore {
    pub fn with_sample_users() -> Self {
        MemoryStore {
            mem: vec![User {
                id: "user1".to_string(),
                name: "1".to_string(),
                strength: 10,
                session_data: Some("some_data".to_string()),
            }],
        }
    }
}

impl Store for MemoryStore {
    fn fetch(&self, id: &str) -> Option<User> {
        self.mem.iter().find(|user| user.id == id).cloned()
    }
}

/// Session reading its data straight from the store it was built around
pub struct InStoreSession {
    store: DynStore,
}

impl InStoreSession {
    pub fn new(store: DynStore) -> Self {
        InStoreSession { store }
    }

    pub fn get_data(&self, id: &str) -> String {
        self.store
            .fetch(id)
            .and_then(|user| user.session_data)
            .unwrap_or_default()
    }
}
