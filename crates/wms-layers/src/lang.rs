//! Current UI language.

use std::sync::{Arc, RwLock};

/// Source of the language code sent with legend requests.
pub trait LanguageProvider: Send + Sync {
    fn current(&self) -> String;
}

/// A language that never changes.
#[derive(Debug, Clone)]
pub struct FixedLanguage(String);

impl FixedLanguage {
    pub fn new(lang: impl Into<String>) -> Self {
        Self(lang.into())
    }
}

impl LanguageProvider for FixedLanguage {
    fn current(&self) -> String {
        self.0.clone()
    }
}

/// A language the UI can switch at runtime. Clones share the same value.
#[derive(Debug, Clone)]
pub struct SwitchableLanguage {
    lang: Arc<RwLock<String>>,
}

impl SwitchableLanguage {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: Arc::new(RwLock::new(lang.into())),
        }
    }

    pub fn set(&self, lang: impl Into<String>) {
        let mut current = self.lang.write().unwrap_or_else(|e| e.into_inner());
        *current = lang.into();
    }
}

impl LanguageProvider for SwitchableLanguage {
    fn current(&self) -> String {
        self.lang.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switchable_language_is_shared() {
        let lang = SwitchableLanguage::new("de");
        let handle = lang.clone();
        handle.set("rm");
        assert_eq!(lang.current(), "rm");
        assert_eq!(FixedLanguage::new("fr").current(), "fr");
    }
}
