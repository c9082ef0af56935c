use super::BlockEvaluator;

/// Factory function type for creating evaluator instances
pub type EvaluatorFactory = fn() -> Box<dyn BlockEvaluator>;

/// Inventory registration of an evaluator backend
pub struct EvaluatorRegistration {
    pub language: &'static str,
    pub factory: EvaluatorFactory,
}

inventory::collect!(EvaluatorRegistration);

/// Look up a registered evaluator by language id
pub fn evaluator_for(language: &str) -> Option<Box<dyn BlockEvaluator>> {
    inventory::iter::<EvaluatorRegistration>()
        .find(|registration| registration.language == language)
        .map(|registration| (registration.factory)())
}

/// List all registered evaluator languages
pub fn list_languages() -> Vec<&'static str> {
    inventory::iter::<EvaluatorRegistration>()
        .map(|registration| registration.language)
        .collect()
}
