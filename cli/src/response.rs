//! Turning a raw HTTP exchange into a message for the user.

use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub async fn read(resp: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(Self { status, body })
    }

    pub fn is_ok(&self) -> bool {
        self.status < 400
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

/// Messages shown for each class of status code.
#[derive(Debug, Clone, Copy)]
pub struct ResponseMessages<'a> {
    pub if_2xx: &'a str,
    pub if_4xx: &'a str,
    pub if_others: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Continue(Option<String>),
    Fail(String),
}

/// `code` and `message` from a JSON error body. Both keys must be present;
/// their values may be any JSON.
fn error_fields(body: &str) -> Option<(String, String)> {
    let v: Value = serde_json::from_str(body).ok()?;
    Some((scalar_text(v.get("code")?), scalar_text(v.get("message")?)))
}

/// Strings bare, everything else as JSON text.
pub fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn explain(resp: &ApiResponse, msgs: ResponseMessages<'_>, exit_if_4xx: bool) -> Explanation {
    if resp.is_ok() {
        let msg = (!msgs.if_2xx.is_empty()).then(|| msgs.if_2xx.to_string());
        return Explanation::Continue(msg);
    }

    let client_error = resp.is_client_error();
    let errmsg = if client_error {
        msgs.if_4xx
    } else {
        msgs.if_others
    };
    let text = match error_fields(&resp.body) {
        Some((code, message)) => format!("{} {}: {}\n{}", resp.status, code, message, errmsg),
        None => format!("{}: {}\n{}", resp.status, resp.body, errmsg),
    };

    if client_error && !exit_if_4xx {
        Explanation::Continue(Some(text))
    } else {
        Explanation::Fail(text)
    }
}

/// Print what `explain` decided; failures go back to the caller as errors.
pub fn explain_response(
    resp: &ApiResponse,
    msgs: ResponseMessages<'_>,
    exit_if_4xx: bool,
) -> Result<(), CliError> {
    match explain(resp, msgs, exit_if_4xx) {
        Explanation::Continue(Some(text)) => {
            println!("{text}");
            Ok(())
        }
        Explanation::Continue(None) => Ok(()),
        Explanation::Fail(text) => Err(CliError::Response(text)),
    }
}
