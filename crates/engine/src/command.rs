// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool command-line construction.
//!
//! The command line runs inside the multiplexer window's shell, so
//! environment variables are injected as `VAR=value` prefixes and the
//! prompt file is attached with a stdin redirect (except for gemini,
//! which takes the prompt through its flag).

use coders_core::{SessionId, Tool};
use std::path::Path;

/// Alternate tool-backend override injected into the tool's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOverride {
    pub base_url: String,
    pub auth_token: String,
}

/// Environment variable names carrying the backend override, per tool.
fn backend_env_names(tool: Tool) -> (&'static str, &'static str) {
    match tool {
        Tool::Claude => ("ANTHROPIC_BASE_URL", "ANTHROPIC_AUTH_TOKEN"),
        Tool::Gemini => ("GOOGLE_GEMINI_BASE_URL", "GEMINI_API_KEY"),
        Tool::Codex => ("OPENAI_BASE_URL", "OPENAI_API_KEY"),
        Tool::Opencode => ("OPENCODE_BASE_URL", "OPENCODE_API_KEY"),
    }
}

/// Quote a value for a `VAR=value` prefix or argument position.
fn quote(s: &str) -> String {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | '_' | ':' | '=' | '@'))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Build the shell line that starts the tool inside the session window.
pub fn build_tool_command(
    tool: Tool,
    session_id: &SessionId,
    model: Option<&str>,
    prompt_text: &str,
    prompt_file: Option<&Path>,
    backend: Option<&BackendOverride>,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("CODERS_SESSION_ID={}", quote(session_id.as_str())));
    if let Some(backend) = backend {
        let (url_var, token_var) = backend_env_names(tool);
        parts.push(format!("{}={}", url_var, quote(&backend.base_url)));
        parts.push(format!("{}={}", token_var, quote(&backend.auth_token)));
    }

    parts.push(tool.as_str().to_string());

    if let Some(model) = model {
        parts.push("--model".to_string());
        parts.push(quote(model));
    }

    if tool.reads_prompt_from_stdin() {
        if let Some(path) = prompt_file {
            parts.push("<".to_string());
            parts.push(quote(&path.display().to_string()));
        }
    } else {
        parts.push("-i".to_string());
        parts.push(quote(prompt_text));
    }

    parts.join(" ")
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
