use hooklet::{Config, Method, Request, Response, ResponseBuilder, Server};
use serde_json::{Value, json};

/// Webhook endpoint: accepts POSTed JSON payloads, answers health checks.
fn handle_webhook(req: Request) -> Response {
    match (&req.method, req.path.as_str()) {
        (Method::GET, "/health") => Response::text("ok"),
        (Method::POST, _) => handle_payload(&req),
        _ => ResponseBuilder::new(400)
            .header("Content-Type", "text/plain")
            .body("Invalid request method.")
            .build(),
    }
}

fn handle_payload(req: &Request) -> Response {
    let reply = |status: u16, body: String| {
        ResponseBuilder::new(status)
            .header("Content-Type", "application/json")
            .body(body)
            .build()
    };

    let payload: Value = match serde_json::from_slice(&req.body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(path = %req.path, error = %e, "rejecting malformed payload");
            return reply(400, json!({ "error": e.to_string() }).to_string());
        }
    };

    match payload.get("command") {
        Some(command) => {
            tracing::info!(path = %req.path, %command, "webhook command received");
            reply(
                200,
                r#"{"status": "success", "message": "Command executed successfully"}"#.to_string(),
            )
        }
        None => {
            tracing::info!(path = %req.path, bytes = req.body.len(), "webhook received");
            reply(200, r#"{"received": "POST request received"}"#.to_string())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let mut server = Server::with_config(&cfg, handle_webhook)?;
    let stop = server.stop_handle();

    // The reactor blocks its thread for good; keep it off the runtime.
    let mut reactor = tokio::task::spawn_blocking(move || server.start());

    tokio::select! {
        res = &mut reactor => {
            res??;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            stop.stop();
            reactor.await??;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hooklet::http::request::RequestBuilder;

    fn post(body: &str) -> Response {
        handle_webhook(RequestBuilder::new(Method::POST, "/webhook").body(body).build())
    }

    fn body_json(response: &Response) -> Value {
        serde_json::from_slice(&response.body).unwrap()
    }

    #[test]
    fn health_check() {
        let response = handle_webhook(RequestBuilder::new(Method::GET, "/health").build());

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"ok".to_vec());
    }

    #[test]
    fn invalid_json_is_rejected() {
        let response = post("not json{");

        assert_eq!(response.status, 400);
        assert_eq!(response.headers.get("Content-Type").unwrap(), "application/json");
        assert!(body_json(&response)["error"].is_string());
    }

    #[test]
    fn empty_body_is_rejected() {
        assert_eq!(post("").status, 400);
    }

    #[test]
    fn payload_without_command_is_acknowledged() {
        let response = post(r#"{"data": {"servers": 3}}"#);

        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"received": "POST request received"}"#.to_vec());
    }

    #[test]
    fn payload_with_command_is_executed() {
        let response = post(r#"{"command": "update_status", "status": "idle"}"#);

        assert_eq!(response.status, 200);
        assert_eq!(
            body_json(&response),
            json!({ "status": "success", "message": "Command executed successfully" })
        );
    }

    #[test]
    fn non_object_payload_has_no_command() {
        let response = post("[1, 2, 3]");

        assert_eq!(response.status, 200);
        assert_eq!(body_json(&response)["received"], "POST request received");
    }

    #[test]
    fn other_methods_are_rejected() {
        let response = handle_webhook(RequestBuilder::new(Method::PUT, "/webhook").build());

        assert_eq!(response.status, 400);
        assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
        assert_eq!(response.body, b"Invalid request method.".to_vec());
    }
}
