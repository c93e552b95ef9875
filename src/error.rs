use crate::component::ComponentType;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum DesignerError {
    #[error("Component for {class} not found!")]
    ComponentNotFound { class: String },
    #[error(
        "Component for {class} was registered as a {declared} component, but produced a {produced} object"
    )]
    KindMismatch {
        class: String,
        declared: ComponentType,
        produced: ComponentType,
    },
    #[error("Failed to construct {class}: {reason}")]
    Construction { class: String, reason: String },
    #[error("Project file has no root object")]
    EmptyProject,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) type Result<T> = std::result::Result<T, DesignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DesignerError::ComponentNotFound {
            class: "wxFoo".into(),
        };
        assert_eq!(err.to_string(), "Component for wxFoo not found!");

        let err = DesignerError::KindMismatch {
            class: "wxButton".into(),
            declared: ComponentType::Window,
            produced: ComponentType::Abstract,
        };
        assert!(err.to_string().contains("registered as a window component"));
        assert!(err.to_string().contains("abstract object"));
    }
}
