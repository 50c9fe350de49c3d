/// Errors raised while reading or writing level documents.
///
/// `UnknownObjectKind` and `MalformedField` are per-object: the loader skips
/// the offending object and keeps going. The other variants reject the whole
/// document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("unknown object kind \"{tag}\" at node {node}")]
    UnknownObjectKind { tag: String, node: usize },

    #[error("malformed field `{field}` in {kind} at node {node}: {reason}")]
    MalformedField {
        kind: String,
        field: String,
        node: usize,
        reason: String,
    },

    #[error("malformed level header field `{field}`: {reason}")]
    MalformedHeader { field: String, reason: String },

    #[error("invalid level document: {0}")]
    Document(String),
}

impl ContentError {
    /// Node index for per-object errors.
    pub fn node(&self) -> Option<usize> {
        match self {
            Self::UnknownObjectKind { node, .. } | Self::MalformedField { node, .. } => Some(*node),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ContentError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Document(err.to_string())
    }
}

/// Errors from turning a descriptor into a runtime object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstantiateError {
    #[error("{kind} needs the {missing} size in its placement context")]
    IncompatibleContext {
        kind: &'static str,
        missing: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_tag_and_node() {
        let err = ContentError::UnknownObjectKind {
            tag: "foo".into(),
            node: 3,
        };
        assert_eq!(err.to_string(), "unknown object kind \"foo\" at node 3");
        assert_eq!(err.node(), Some(3));
    }

    #[test]
    fn header_errors_have_no_node() {
        let err = ContentError::MalformedHeader {
            field: "agents".into(),
            reason: "expected an unsigned integer".into(),
        };
        assert_eq!(err.node(), None);
        assert!(err.to_string().contains("agents"));
    }
}
