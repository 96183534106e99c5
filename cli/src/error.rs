use thiserror::Error;

pub const EXIT_GENERIC_FAILURE: i32 = 1;
pub const EXIT_USAGE_FAILURE: i32 = 2;

/// Everything that ends a command early. Helpers return this instead of
/// exiting; `main` prints it and picks the exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("It seems that you are not logged in yet.")]
    NotLoggedIn,

    #[error("'{token}' is ambiguous: {}", .candidates.join(", "))]
    Ambiguous {
        token: String,
        candidates: Vec<String>,
    },

    /// A failed API call. `detail` is the API error text, `message` the
    /// caller's explanation; either may be suppressed.
    #[error("{}", join_lines(.detail.as_deref(), .message.as_deref()))]
    Api {
        detail: Option<String>,
        message: Option<String>,
    },

    #[error("{0}")]
    Response(String),

    #[error("{0}")]
    Check(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Ambiguous { .. } => EXIT_USAGE_FAILURE,
            _ => EXIT_GENERIC_FAILURE,
        }
    }
}

fn join_lines(detail: Option<&str>, message: Option<&str>) -> String {
    [detail, message]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
}
