use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// `{"status": "..."}` body returned by successful mutations.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReply {
    pub status: &'static str,
}

impl StatusReply {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}
