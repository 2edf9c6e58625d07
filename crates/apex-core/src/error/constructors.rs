//! Constructor methods for ApexError

use super::types::ApexError;

impl ApexError {
    /// Create a new server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
            code: None,
            actions: Vec::new(),
            context: None,
        }
    }

    /// Create a server error carrying the service's error code
    pub fn server_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
            code: Some(code.into()),
            actions: Vec::new(),
            context: None,
        }
    }

    /// Create a server error with context
    pub fn server_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
            code: None,
            actions: Vec::new(),
            context: Some(context.into()),
        }
    }

    /// Create a new persistence error
    pub fn persistence(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            actions: Vec::new(),
        }
    }

    /// Create a configuration error with a remediation action
    pub fn config_with_action(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            actions: vec![action.into()],
        }
    }

    /// Create a new report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Replace message and actions, keeping every other field.
    ///
    /// Only server errors carry replaceable text; other variants are returned as-is.
    pub fn with_message_and_actions(self, message: impl Into<String>, actions: Vec<String>) -> Self {
        match self {
            Self::Server { code, context, .. } => Self::Server {
                message: message.into(),
                code,
                actions,
                context,
            },
            other => other,
        }
    }
}
