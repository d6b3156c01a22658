pub mod suggestions;

pub use suggestions::{AiAnalysis, AiSuggestions, SuggestionService, UserPreferences};
