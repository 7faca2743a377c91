/// Language codes understood by the voice clone engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LanguageCode {
    #[default]
    English,
}

impl LanguageCode {
    /// Get the code as passed to the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
