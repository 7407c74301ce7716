//! Language offset lookup.

use super::HandlerError;
use crate::grading::{
    domain::{Language, LanguageSpec},
    ports::CatalogRepository,
};
use std::sync::Arc;

/// Looks up language offsets needed before running a program.
pub struct LanguageResolver<S>
where
    S: CatalogRepository,
{
    store: Arc<S>,
}

impl<S> LanguageResolver<S>
where
    S: CatalogRepository,
{
    /// Creates a resolver.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the configuration of `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::MissingLanguage`] when the language is not
    /// configured, or [`HandlerError::Store`] on storage failure.
    pub async fn resolve(&self, spec: &LanguageSpec) -> Result<Language, HandlerError> {
        self.store
            .find_language(spec)
            .await?
            .ok_or_else(|| HandlerError::MissingLanguage(spec.clone()))
    }

    /// Resolves the program and checker languages together.
    ///
    /// # Errors
    ///
    /// Returns the first error of either lookup.
    pub async fn resolve_pair(
        &self,
        program: &LanguageSpec,
        checker: &LanguageSpec,
    ) -> Result<(Language, Language), HandlerError> {
        tokio::try_join!(self.resolve(program), self.resolve(checker))
    }
}
