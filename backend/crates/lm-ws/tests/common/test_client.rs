#![allow(dead_code)]

use crate::common::jwt_helper::create_test_token;
use crate::common::test_server::TEST_JWT_SECRET;

use axum_test::{TestServer, TestWebSocket, WsMessage};
use serde_json::Value;

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
    pub employee_id: i64,
}

impl WsTestClient {
    /// Connect with `Authorization: Bearer`
    pub async fn connect(server: &TestServer, employee_id: i64, is_manager: bool) -> Self {
        let token = create_test_token(employee_id, is_manager, TEST_JWT_SECRET);

        let ws = server
            .get_websocket("/ws")
            .add_header("Authorization", format!("Bearer {}", token))
            .await
            .into_websocket()
            .await;

        Self { ws, employee_id }
    }

    /// Connect with the `token` query parameter, as browsers do
    pub async fn connect_with_query_token(
        server: &TestServer,
        employee_id: i64,
        is_manager: bool,
    ) -> Self {
        let token = create_test_token(employee_id, is_manager, TEST_JWT_SECRET);

        let ws = server
            .get_websocket("/ws")
            .add_query_param("token", token)
            .await
            .into_websocket()
            .await;

        Self { ws, employee_id }
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn receive_text(&mut self) -> String {
        self.ws.receive_text().await
    }

    /// Next raw frame, control frames included
    pub async fn receive_message(&mut self) -> WsMessage {
        self.ws.receive_message().await
    }

    /// Receive the next notification as JSON
    pub async fn receive_json(&mut self) -> Value {
        let text = self.ws.receive_text().await;
        serde_json::from_str(&text).expect("notification is valid JSON")
    }

    pub async fn close(self) {
        self.ws.close().await;
    }
}
