use trellis_types::TypeError;

/// Deployment problems: the bean metadata handed to the container is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("bean `{bean}` declares no bean types")]
    NoBeanTypes { bean: String },

    #[error("bean `{bean}` declares illegal bean type `{ty}`: {reason}")]
    IllegalBeanType {
        bean: String,
        ty: String,
        reason: &'static str,
    },

    #[error("bean `{bean}` declares a malformed bean type: {source}")]
    MalformedBeanType {
        bean: String,
        #[source]
        source: TypeError,
    },

    #[error("a bean named `{bean}` is already registered")]
    DuplicateBeanName { bean: String },

    #[error("`{annotation}` is not a registered qualifier")]
    UnknownQualifier { annotation: String },

    #[error("qualifier `{annotation}` has no member `{member}`")]
    UnknownQualifierMember { annotation: String, member: String },

    #[error("qualifier `{annotation}` requires a value for member `{member}`")]
    MissingQualifierMember { annotation: String, member: String },

    #[error("`{stereotype}` is not a registered stereotype")]
    UnknownStereotype { stereotype: String },

    #[error("bean `{bean}` inherits conflicting priorities {priorities:?} from its stereotypes")]
    MultiplePriorityValues { bean: String, priorities: Vec<i32> },

    #[error("bean `{bean}` has stereotype `{stereotype}` but none of its types is a `{required}`")]
    StereotypeRequiredType {
        bean: String,
        stereotype: String,
        required: String,
    },

    #[error("bean `{bean}` specializes unknown bean `{specialized}`")]
    UnknownSpecializedBean { bean: String, specialized: String },
}

/// Errors that abort a lookup. Unsatisfied and ambiguous lookups are not errors; they are
/// reported through [`crate::ResolutionResult`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
