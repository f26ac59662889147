//! W3C WebDriver client
//!
//! Drives a browser through a WebDriver server such as chromedriver. Only
//! the handful of endpoints the gateway needs are implemented: create and
//! delete a session, navigate, and execute a synchronous script.
//!
//! HTTP calls are blocking, so each one runs on tokio's blocking pool.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::bridge::ScriptBridge;
use crate::error::RemoteError;

/// WebDriver error codes meaning the page can no longer be driven
const FATAL_ERRORS: &[&str] = &[
    "invalid session id",
    "no such window",
    "no such frame",
    "session not created",
];

/// Browser session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// WebDriver server base URL
    pub server_url: String,
    /// Value of the `browserName` capability
    pub browser: String,
    /// Run the browser without a window
    pub headless: bool,
    /// Bound on each WebDriver HTTP call (ms)
    pub request_timeout_ms: u64,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:9515".to_string(),
            browser: "chrome".to_string(),
            headless: false,
            request_timeout_ms: 5000,
        }
    }
}

impl WebDriverConfig {
    /// Capabilities sent with the new-session request
    pub fn capabilities(&self) -> Value {
        let mut always_match = json!({ "browserName": self.browser });
        if self.headless && self.browser == "chrome" {
            always_match["goog:chromeOptions"] = json!({ "args": ["--headless=new"] });
        }
        json!({ "capabilities": { "alwaysMatch": always_match } })
    }
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Post,
    Delete,
}

/// An open browser session
pub struct WebDriverSession {
    agent: Agent,
    session_url: String,
}

impl WebDriverSession {
    /// Open a new browser session
    pub async fn start(config: &WebDriverConfig) -> Result<Self, RemoteError> {
        let agent = make_agent(Duration::from_millis(config.request_timeout_ms));
        let server = config.server_url.trim_end_matches('/').to_string();

        let value = call(
            agent.clone(),
            Method::Post,
            format!("{}/session", server),
            Some(config.capabilities()),
        )
        .await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| RemoteError::Bridge("new session reply has no sessionId".into()))?;

        info!("Opened {} session {}", config.browser, session_id);
        Ok(Self {
            session_url: format!("{}/session/{}", server, session_id),
            agent,
        })
    }

    /// Load `url` in the session's window
    pub async fn navigate(&mut self, url: &str) -> Result<(), RemoteError> {
        info!("Loading {}", url);
        self.command(Method::Post, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    /// Close the browser
    pub async fn close(self) {
        if let Err(e) = self.command(Method::Delete, "", None).await {
            warn!("Failed to close browser session: {}", e);
        }
    }

    /// Run a script with arguments and return its result
    pub async fn execute_with_args(
        &mut self,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, RemoteError> {
        debug!("execute: {}", script);
        self.command(
            Method::Post,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, RemoteError> {
        call(
            self.agent.clone(),
            method,
            format!("{}{}", self.session_url, path),
            body,
        )
        .await
    }
}

impl ScriptBridge for WebDriverSession {
    async fn execute(&mut self, script: &str) -> Result<(), RemoteError> {
        self.execute_with_args(script, Vec::new()).await?;
        Ok(())
    }

    async fn read_field(&mut self, name: &str) -> Result<Option<String>, RemoteError> {
        let value = self
            .execute_with_args(
                "var e = document.getElementsByName(arguments[0])[0]; return e ? e.value : null;",
                vec![json!(name)],
            )
            .await?;

        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }
}

fn make_agent(timeout: Duration) -> Agent {
    let config = Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build();
    Agent::new_with_config(config)
}

/// Perform one WebDriver call on the blocking pool
async fn call(
    agent: Agent,
    method: Method,
    url: String,
    body: Option<Value>,
) -> Result<Value, RemoteError> {
    tokio::task::spawn_blocking(move || call_blocking(&agent, method, &url, body))
        .await
        .map_err(|e| RemoteError::Bridge(format!("WebDriver call aborted: {}", e)))?
}

fn call_blocking(
    agent: &Agent,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, RemoteError> {
    let result = match method {
        Method::Post => agent.post(url).send_json(body.unwrap_or_else(|| json!({}))),
        Method::Delete => agent.delete(url).call(),
    };

    let mut response = result.map_err(transport_error)?;
    let status = response.status();
    let reply: Value = response.body_mut().read_json().map_err(transport_error)?;

    let value = reply.get("value").cloned().unwrap_or(Value::Null);
    if status.is_success() {
        Ok(value)
    } else {
        Err(classify_error(&value))
    }
}

/// Map an HTTP failure onto the gateway's error classes
///
/// A server that answers too slowly is still there; one that cannot be
/// reached or replies with garbage is not.
fn transport_error(e: ureq::Error) -> RemoteError {
    match e {
        ureq::Error::Timeout(ureq::Timeout::Resolve | ureq::Timeout::Connect) => {
            RemoteError::Bridge(format!("WebDriver unreachable: {}", e))
        }
        ureq::Error::Timeout(_) => RemoteError::Script(format!("WebDriver timed out: {}", e)),
        ureq::Error::Io(ref io) if io.kind() == std::io::ErrorKind::TimedOut => {
            RemoteError::Script(format!("WebDriver timed out: {}", e))
        }
        other => RemoteError::Bridge(format!("WebDriver unreachable: {}", other)),
    }
}

/// Map a WebDriver error object onto the gateway's error classes
fn classify_error(value: &Value) -> RemoteError {
    let code = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let message = value.get("message").and_then(Value::as_str).unwrap_or("");
    let text = if message.is_empty() {
        code.to_string()
    } else {
        format!("{}: {}", code, message)
    };

    if FATAL_ERRORS.contains(&code) {
        RemoteError::Bridge(text)
    } else {
        RemoteError::Script(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_window_is_bridge_error() {
        let err = classify_error(&json!({
            "error": "no such window",
            "message": "target window already closed",
            "stacktrace": ""
        }));
        assert_eq!(
            err,
            RemoteError::Bridge("no such window: target window already closed".into())
        );
        assert!(classify_error(&json!({ "error": "invalid session id" })).is_fatal());
    }

    #[test]
    fn test_javascript_error_is_transient() {
        let err = classify_error(&json!({
            "error": "javascript error",
            "message": "setfreqb is not defined"
        }));
        assert!(matches!(err, RemoteError::Script(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_timeout_is_transient() {
        let err = transport_error(ureq::Error::Timeout(ureq::Timeout::Global));
        assert!(matches!(err, RemoteError::Script(_)));
        assert!(!err.is_fatal());

        assert!(transport_error(ureq::Error::ConnectionFailed).is_fatal());
        assert!(transport_error(ureq::Error::Timeout(ureq::Timeout::Connect)).is_fatal());
    }

    #[test]
    fn test_capabilities() {
        let config = WebDriverConfig::default();
        assert_eq!(
            config.capabilities(),
            json!({ "capabilities": { "alwaysMatch": { "browserName": "chrome" } } })
        );

        let headless = WebDriverConfig {
            headless: true,
            ..Default::default()
        };
        let caps = headless.capabilities();
        assert_eq!(
            caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"][0],
            "--headless=new"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_bridge_error() {
        let config = WebDriverConfig {
            server_url: "http://127.0.0.1:1".into(),
            request_timeout_ms: 500,
            ..Default::default()
        };
        let result = WebDriverSession::start(&config).await;
        assert!(matches!(result, Err(RemoteError::Bridge(_))));
    }

    #[tokio::test]
    async fn test_silent_server_is_transient() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            // Accept and hold the connection without answering
            let (_stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_secs(2));
        });

        let result = call(
            make_agent(Duration::from_millis(200)),
            Method::Post,
            format!("http://{}/session/abc/execute/sync", addr),
            Some(json!({ "script": "return 1;", "args": [] })),
        )
        .await;

        assert!(matches!(result, Err(RemoteError::Script(_))));
    }
}
