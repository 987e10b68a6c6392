use serde::Serialize;

/// Body of `GET /health`: process status plus which storage paths are wired.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub status: &'static str,
    pub table_storage: bool,
    pub relational: bool,
}

impl Health {
    pub fn ok(relational: bool) -> Self {
        // table storage 总是启用
        Self { status: "ok", table_storage: true, relational }
    }
}
