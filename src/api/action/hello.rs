use axum::response::IntoResponse;
use http::StatusCode;

pub(crate) async fn hello() -> impl IntoResponse {
    (StatusCode::OK, "HELLO\n")
}

#[cfg(test)]
mod tests {
    use axum_test::{TestResponse, TestServer};
    use http::StatusCode;
    use crate::api::server::tests::new_test_app;

    #[tokio::test]
    async fn test_hello() {
        let server = TestServer::new(new_test_app()).unwrap();

        let response: TestResponse = server
            .get(&"/")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "HELLO\n");
    }
}
