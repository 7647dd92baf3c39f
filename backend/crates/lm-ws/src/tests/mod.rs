
use crate::{DepartmentLookup, Result as WsErrorResult, WsError};

use lm_auth::EmployeeContext;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::extract::ws::Message;
use error_location::ErrorLocation;
use serde_json::Value;
use tokio::sync::mpsc;

pub(crate) fn employee(employee_id: i64, is_manager: bool) -> EmployeeContext {
    EmployeeContext {
        employee_id,
        is_manager,
        role_name: if is_manager { "manager" } else { "employee" }.to_string(),
        department_id: None,
    }
}

/// Parse the next queued text frame, if any
pub(crate) fn try_receive_json(rx: &mut mpsc::Receiver<Message>) -> Option<Value> {
    match rx.try_recv().ok()? {
        Message::Text(text) => Some(serde_json::from_str(text.as_str()).unwrap()),
        other => panic!("expected text frame, got {other:?}"),
    }
}

/// In-memory department directory; employees mapped to `None` fail their lookup
#[derive(Default)]
pub(crate) struct FakeDepartments {
    departments: HashMap<i64, Option<i64>>,
    calls: AtomicUsize,
}

impl FakeDepartments {
    pub(crate) fn with(mut self, employee_id: i64, department_id: i64) -> Self {
        self.departments.insert(employee_id, Some(department_id));
        self
    }

    pub(crate) fn failing(mut self, employee_id: i64) -> Self {
        self.departments.insert(employee_id, None);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DepartmentLookup for FakeDepartments {
    async fn department_of(&self, employee_id: i64) -> WsErrorResult<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.departments.get(&employee_id) {
            Some(Some(department_id)) => Ok(*department_id),
            _ => Err(WsError::DepartmentLookup {
                employee_id,
                message: "lookup unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
