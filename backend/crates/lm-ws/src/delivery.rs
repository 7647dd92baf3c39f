use crate::ConnectionInfo;

/// Who a notification is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Audience {
    pub for_manager: bool,
    pub target_id: Option<i64>,
}

impl Audience {
    pub fn managers() -> Self {
        Self {
            for_manager: true,
            target_id: None,
        }
    }

    pub fn employee(employee_id: i64) -> Self {
        Self {
            for_manager: false,
            target_id: Some(employee_id),
        }
    }

    /// Positive target ids narrow delivery; zero or negative means untargeted
    pub fn target(&self) -> Option<i64> {
        self.target_id.filter(|id| *id > 0)
    }

    pub fn admits(&self, endpoint: &ConnectionInfo) -> bool {
        should_deliver(*self, endpoint.is_manager, endpoint.employee_id)
    }
}

/// Role-and-identity delivery policy.
///
/// The endpoint's role flag must equal `for_manager`; a target further restricts
/// delivery to the endpoint with that identity.
pub fn should_deliver(audience: Audience, is_manager: bool, employee_id: i64) -> bool {
    if audience.for_manager != is_manager {
        return false;
    }

    match audience.target() {
        Some(target) => target == employee_id,
        None => true,
    }
}
