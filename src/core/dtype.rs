use std::fmt;

/// Port type tags understood by the graph editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortTag {
    Complex,
    Float,
    Int,
    Short,
    Byte,
    Message,
}

impl PortTag {
    /// Map an elementary signal dtype name to its port tag.
    ///
    /// Returns None for anything outside the fixed table; callers treat
    /// that as a hard extraction failure.
    pub fn from_dtype(dtype: &str) -> Option<PortTag> {
        match dtype {
            "complex64" | "complex" => Some(PortTag::Complex),
            "float32" | "float" => Some(PortTag::Float),
            "int32" | "uint32" => Some(PortTag::Int),
            "int16" | "uint16" => Some(PortTag::Short),
            "int8" | "uint8" => Some(PortTag::Byte),
            _ => None,
        }
    }

    /// Stable string form used in the io cache and in generated names
    pub fn as_str(&self) -> &'static str {
        match self {
            PortTag::Complex => "complex",
            PortTag::Float => "float",
            PortTag::Int => "int",
            PortTag::Short => "short",
            PortTag::Byte => "byte",
            PortTag::Message => "message",
        }
    }

    /// Inverse of `as_str`, used when reading cache blobs back
    pub fn parse(tag: &str) -> Option<PortTag> {
        match tag {
            "complex" => Some(PortTag::Complex),
            "float" => Some(PortTag::Float),
            "int" => Some(PortTag::Int),
            "short" => Some(PortTag::Short),
            "byte" => Some(PortTag::Byte),
            "message" => Some(PortTag::Message),
            _ => None,
        }
    }
}

impl fmt::Display for PortTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
