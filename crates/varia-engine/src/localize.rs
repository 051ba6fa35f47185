//! Localization hook.
//!
//! String tables live with the host. The session only decides *when* an
//! installed [`Localizer`] runs: on the raw source, or on the composed result.

/// Substitutes text for the current locale.
pub trait Localizer {
    /// Return the localized form of `text`.
    fn localize(&self, text: &str) -> String;
}

impl<F> Localizer for F
where
    F: Fn(&str) -> String,
{
    fn localize(&self, text: &str) -> String {
        self(text)
    }
}

/// When an installed localizer is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocalizeStage {
    /// To the raw source, before parsing. Lets tables supply directives.
    #[default]
    BeforeParse,
    /// To the resolved string, after composition.
    AfterCompose,
}
