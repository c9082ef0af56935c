/// Where a parameter came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamOrigin {
    /// Declared by the block's source snippet; owned by reconciliation
    Discovered,
    /// Built into the block kind, e.g. the source-code parameter
    Intrinsic,
}

/// Value kind hint for the editor's widget system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Untyped value, entered verbatim
    Raw,
    /// Multiline code, edited externally
    Code,
}

/// A parameter owned by a live block
#[derive(Debug, Clone)]
pub struct LiveParam {
    pub id: String,
    /// Human-readable label shown by the editor
    pub name: String,
    pub kind: ParamKind,
    /// Current value, as the user entered it
    pub value: String,
    /// Default declared by the block's signature
    pub default: String,
    pub origin: ParamOrigin,
    /// Validation messages attached to this parameter
    pub error_messages: Vec<String>,
}

impl LiveParam {
    pub fn intrinsic(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ParamKind,
        value: impl Into<String>,
    ) -> Self {
        let value = value.into();
        LiveParam {
            id: id.into(),
            name: name.into(),
            kind,
            default: value.clone(),
            value,
            origin: ParamOrigin::Intrinsic,
            error_messages: Vec::new(),
        }
    }

    /// Create a parameter discovered in the block's source, with its
    /// value initialized to the declared default.
    pub fn discovered(id: &str, default: &str) -> Self {
        LiveParam {
            id: id.to_string(),
            name: humanize(id),
            kind: ParamKind::Raw,
            value: default.to_string(),
            default: default.to_string(),
            origin: ParamOrigin::Discovered,
            error_messages: Vec::new(),
        }
    }

    pub fn is_discovered(&self) -> bool {
        self.origin == ParamOrigin::Discovered
    }

    pub fn add_error_message(&mut self, message: impl Into<String>) {
        self.error_messages.push(message.into());
    }
}

/// "sample_rate" -> "Sample Rate"
pub(crate) fn humanize(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
