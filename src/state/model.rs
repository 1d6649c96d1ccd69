/// Whether the surface holds a signature mark, and how it was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignaturePresence {
    #[default]
    Empty,
    Drawn,
    Generated,
}

impl SignaturePresence {
    pub const fn has_mark(self) -> bool {
        !matches!(self, Self::Empty)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Drawn => "drawn",
            Self::Generated => "generated",
        }
    }
}
