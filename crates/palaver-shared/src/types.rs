use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Ids are opaque strings so seeded data ("1", "msg1-3") and generated ids
// ("msg-<uuid>") live side by side.
macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(UserId);
string_id!(ConversationId);
string_id!(MessageId);
string_id!(AttachmentId);

impl MessageId {
    /// Fresh, globally unique message id.
    pub fn generate() -> Self {
        Self(format!("msg-{}", Uuid::new_v4()))
    }
}

impl AttachmentId {
    pub fn generate() -> Self {
        Self(format!("att-{}", Uuid::new_v4()))
    }
}
