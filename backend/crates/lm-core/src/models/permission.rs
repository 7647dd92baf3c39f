use serde::{Deserialize, Serialize};

/// Fine-grained permission checked by the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "users:read")]
    UsersRead,
    #[serde(rename = "users:write")]
    UsersWrite,
    #[serde(rename = "reports:read")]
    ReportsRead,
    #[serde(rename = "leave:read")]
    LeaveRead,
    #[serde(rename = "leave:write")]
    LeaveWrite,
    #[serde(rename = "leave:approve")]
    LeaveApprove,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsersRead => "users:read",
            Self::UsersWrite => "users:write",
            Self::ReportsRead => "reports:read",
            Self::LeaveRead => "leave:read",
            Self::LeaveWrite => "leave:write",
            Self::LeaveApprove => "leave:approve",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
