use std::io::Write;

use clap::ValueEnum;
use hvac_contract::{ErrorKind, Response};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// JSON rendering of a [`Response`].
#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
}

impl<'a> Envelope<'a> {
    fn from_response(resp: &'a Response) -> Self {
        if !resp.is_success() {
            return Self {
                success: false,
                data: None,
                error: Some(resp.message.as_str()),
                kind: resp.kind,
            };
        }
        // Payloads are JSON in practice; anything else is shown as text.
        let data = (!resp.payload.is_empty()).then(|| {
            serde_json::from_slice(&resp.payload).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&resp.payload).into_owned())
            })
        });
        Self {
            success: true,
            data,
            error: None,
            kind: None,
        }
    }
}

pub fn render_json(resp: &Response) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope::from_response(resp))
}

pub fn print(resp: &Response, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(resp)?),
        OutputFormat::Text if resp.is_success() => {
            if !resp.payload.is_empty() {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&resp.payload)?;
                stdout.write_all(b"\n")?;
            }
        }
        OutputFormat::Text => eprintln!("Error: {}", resp.message),
    }
    Ok(())
}
