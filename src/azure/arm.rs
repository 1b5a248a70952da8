//! Thin REST layer over the Azure Resource Manager endpoint.
//!
//! One send path per request, bearer token attached per call, and the standard
//! ARM long-running-operation loop: follow the `Azure-AsyncOperation` or
//! `Location` header and poll until the operation reports a terminal state.
//! No retries; a failed call is returned to the caller as-is.

use super::auth::MANAGEMENT_SCOPE;
use crate::config;
use azure_core::auth::TokenCredential;
use colored::Colorize;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

const ARM_ENDPOINT: &str = "https://management.azure.com";

/// How the provider asked us to poll a long-running operation.
enum PollStyle {
    /// `Azure-AsyncOperation`: polls return an operation-status document.
    AsyncOperation,
    /// `Location`: polls return 202 until done, then the result itself.
    Location,
}

/// Authenticated client for ARM REST calls.
pub struct ArmClient {
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
}

impl ArmClient {
    pub fn new(credential: Arc<dyn TokenCredential>) -> ArmClient {
        ArmClient {
            http: reqwest::Client::new(),
            credential,
        }
    }

    async fn bearer(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        let token = self
            .credential
            .get_token(&[MANAGEMENT_SCOPE])
            .await
            .map_err(|e| format!("Failed to acquire management token: {e}"))?;
        Ok(token.token.secret().to_string())
    }

    /// GET a resource and return its JSON body.
    pub async fn get(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Value, Box<dyn Error + Send + Sync>> {
        self.send(Method::GET, path, api_version, None).await
    }

    /// Send one request and, when the provider answers with a long-running
    /// operation, wait for that operation to complete.
    ///
    /// # Arguments
    /// * `path` - Resource path below the ARM endpoint
    /// * `api_version` - API version query parameter
    /// * `body` - Optional JSON request body
    ///
    /// # Returns
    /// * `Ok(Value)` - Final resource or result body (`Null` when the provider
    ///   returns none, e.g. for deletes)
    /// * `Err` - HTTP failure or a terminal `Failed`/`Canceled` operation
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        body: Option<Value>,
    ) -> Result<Value, Box<dyn Error + Send + Sync>> {
        let url = format!("{ARM_ENDPOINT}{path}?api-version={api_version}");
        log::debug!("{method} {url}", url = url.as_str().on_blue());

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(self.bearer().await?);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.wait_for_completion(&method, path, api_version, response)
            .await
    }

    /// Drive a response to completion, polling the operation when needed.
    async fn wait_for_completion(
        &self,
        method: &Method,
        path: &str,
        api_version: &str,
        response: Response,
    ) -> Result<Value, Box<dyn Error + Send + Sync>> {
        let status = response.status();
        let poll = poll_target(method, &response);
        let text = response.text().await?;

        if !status.is_success() {
            log::warn!(
                "{failed} {method} {path}",
                failed = "failed".on_red(),
            );
            return Err(format!(
                "ERROR {status} from {path}: {snippet}",
                snippet = snippet(&text)
            )
            .into());
        }

        // Anything other than 201/202, or no poll header, is already complete.
        let Some((style, poll_url)) = poll else {
            return parse_body(&text);
        };
        if status != StatusCode::ACCEPTED && status != StatusCode::CREATED {
            return parse_body(&text);
        }

        loop {
            tokio::time::sleep(Duration::from_millis(config::POLL_MSEC)).await;

            let response = self
                .http
                .get(&poll_url)
                .bearer_auth(self.bearer().await?)
                .send()
                .await?;
            let status = response.status();
            let text = response.text().await?;

            if status == StatusCode::ACCEPTED {
                log::trace!("operation still running: {path}");
                continue;
            }
            if !status.is_success() {
                return Err(format!(
                    "ERROR {status} while polling {path}: {snippet}",
                    snippet = snippet(&text)
                )
                .into());
            }

            match style {
                PollStyle::Location => {
                    // 200/204 from the Location URL carries the result.
                    return parse_body(&text);
                }
                PollStyle::AsyncOperation => {
                    let doc = parse_body(&text)?;
                    let op_status = doc
                        .get("status")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    match op_status.as_deref() {
                        Some("Succeeded") => {
                            return self.operation_result(method, path, api_version, doc).await;
                        }
                        Some(ended @ ("Failed" | "Canceled")) => {
                            return Err(format!(
                                "Operation on {path} ended as {ended}: {}",
                                operation_error(&doc)
                            )
                            .into());
                        }
                        Some(other) => {
                            log::trace!("operation status '{other}' for {path}");
                            continue;
                        }
                        // No status field: treat the document as the result.
                        None => return Ok(doc),
                    }
                }
            }
        }
    }

    /// Resolve the final value once an async operation reports `Succeeded`.
    async fn operation_result(
        &self,
        method: &Method,
        path: &str,
        api_version: &str,
        status_doc: Value,
    ) -> Result<Value, Box<dyn Error + Send + Sync>> {
        if *method == Method::PUT || *method == Method::PATCH {
            // The created/updated resource is re-read for its final state.
            Box::pin(self.get(path, api_version)).await
        } else if *method == Method::DELETE {
            Ok(Value::Null)
        } else {
            // Action results ride inside the status document when present.
            Ok(status_doc
                .get("properties")
                .cloned()
                .unwrap_or(Value::Null))
        }
    }
}

/// Pick the poll header for this response, if any.
///
/// Action (POST) results come back through `Location`; management writes
/// prefer `Azure-AsyncOperation` when both are present.
fn poll_target(method: &Method, response: &Response) -> Option<(PollStyle, String)> {
    let header = |name: &str| -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let async_op = header("azure-asyncoperation").map(|u| (PollStyle::AsyncOperation, u));
    let location = header("location").map(|u| (PollStyle::Location, u));

    if *method == Method::POST {
        location.or(async_op)
    } else {
        async_op.or(location)
    }
}

/// Parse a response body, tolerating the empty bodies ARM uses for 200/204.
fn parse_body(text: &str) -> Result<Value, Box<dyn Error + Send + Sync>> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| {
        log::error!("OUTPUT START:\n\n{text}\n\nOUTPUT END\n");
        format!("Error parsing response JSON: {e}").into()
    })
}

/// Deserialize a JSON value into a typed body, naming the offending path on
/// shape mismatches.
pub fn parse_typed<T: DeserializeOwned>(value: Value) -> Result<T, Box<dyn Error + Send + Sync>> {
    serde_path_to_error::deserialize(value)
        .map_err(|e| format!("Error parsing response: path={} error={}", e.path(), e).into())
}

/// Error message carried inside an operation-status document, if any.
fn operation_error(doc: &Value) -> String {
    doc.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("no error detail")
        .to_string()
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(400) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_empty_is_null() {
        assert_eq!(parse_body("").unwrap(), Value::Null);
        assert_eq!(parse_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_body_json() {
        let value = parse_body(r#"{"name":"rg-peering-probe"}"#).unwrap();
        assert_eq!(value["name"], "rg-peering-probe");
        assert!(parse_body("not json").is_err());
    }

    #[test]
    fn test_parse_typed_names_the_failing_path() {
        #[derive(serde::Deserialize, Debug)]
        struct Body {
            #[allow(dead_code)]
            name: String,
        }
        let err = parse_typed::<Body>(serde_json::json!({ "name": 42 }))
            .unwrap_err()
            .to_string();
        assert!(err.contains("name"), "got: {err}");
    }

    #[test]
    fn test_operation_error_extraction() {
        let doc = serde_json::json!({
            "status": "Failed",
            "error": { "code": "DeploymentFailed", "message": "quota exceeded" }
        });
        assert_eq!(operation_error(&doc), "quota exceeded");
        assert_eq!(
            operation_error(&serde_json::json!({ "status": "Failed" })),
            "no error detail"
        );
    }

    #[test]
    fn test_snippet_truncates_long_bodies() {
        let long = "x".repeat(2_000);
        assert_eq!(snippet(&long).len(), 400);
        assert_eq!(snippet("short"), "short");
        assert_eq!(snippet(""), "");
    }
}
