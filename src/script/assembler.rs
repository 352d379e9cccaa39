//! Concatenation of the fixed blocks and the subtask projections into one script.

use super::subtasks::SubtaskLease;
use super::template;
use crate::session::Credentials;
use std::fmt;
use tracing::debug;

/// Knobs that change how values are substituted into the script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Escape `Send` modifiers and quotes in the credential values.
    pub escape_credentials: bool,
}

/// The finished script for one completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledScript {
    /// Task key, `RemoteDesktop_<index>`.
    pub key: String,
    /// Full AutoIt text.
    pub text: String,
}

impl fmt::Display for CompiledScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build the script for task `index` and consume the leased fragments.
///
/// Order: declaration, open sequence, call sites (nested two levels), close
/// sequence, fragment bodies. The lease is drained only after both
/// projections have been rendered.
pub fn assemble(
    index: u32,
    credentials: &Credentials,
    subtasks: SubtaskLease<'_>,
    options: AssembleOptions,
) -> CompiledScript {
    let (computer, username, password) = if options.escape_credentials {
        (
            template::escape_send_text(&credentials.computer),
            template::escape_send_text(&credentials.username),
            template::escape_send_text(&credentials.password),
        )
    } else {
        (
            credentials.computer.clone(),
            credentials.username.clone(),
            credentials.password.clone(),
        )
    };

    let call_sites = template::indent(&subtasks.render_call_sites(), template::CALL_SITE_INDENT);
    let bodies = subtasks.render_bodies();

    let mut text = template::declaration(index);
    text.push_str(&template::open_sequence(index, &computer, &username, &password));
    text.push_str(&call_sites);
    text.push_str(&template::close_sequence());
    text.push_str(&bodies);

    let consumed = subtasks.drain();
    debug!(index, consumed, bytes = text.len(), "assembled script");

    CompiledScript {
        key: template::function_name(index),
        text,
    }
}
