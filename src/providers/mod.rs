pub mod gemini;
pub mod google_translate;
pub mod traits;

pub use gemini::GeminiProvider;
pub use google_translate::GoogleTranslateProvider;
pub use traits::{CompletionProvider, TranslationBackend};
