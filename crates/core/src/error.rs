/// Result alias that carries the custom [`NarrativeVizError`] type.
pub type Result<T> = std::result::Result<T, NarrativeVizError>;

/// Common error type for the core crate.
///
/// Every lookup failure names the rejected value and lists the accepted ones
/// in catalog order.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeVizError {
    #[error("unknown narrative model `{name}`; valid models: {}", .valid.join(", "))]
    UnknownModel {
        name: String,
        valid: Vec<&'static str>,
    },
    #[error("unknown layout type `{name}`; valid layout types: {}", .valid.join(", "))]
    UnknownLayoutType {
        name: String,
        valid: Vec<&'static str>,
    },
    #[error("unknown lens `{name}`; available lenses: {}", .valid.join(", "))]
    UnknownLens {
        name: String,
        valid: Vec<&'static str>,
    },
    /// A collection argument that must not be empty was empty.
    #[error("{0}")]
    EmptyInput(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_model_message_lists_valid_names() {
        let err = NarrativeVizError::UnknownModel {
            name: "epic".to_string(),
            valid: vec!["three_act", "in_medias_res"],
        };
        let message = err.to_string();
        assert!(message.contains("`epic`"));
        assert!(message.ends_with("three_act, in_medias_res"));
    }
}
