//! Leptos context for the shared [`UiConfig`].

use leptos::*;
use system_ui_headless::UiConfig;

/// Installs `config` as the UI defaults for every primitive below the current owner.
pub fn provide_ui_config(config: UiConfig) {
    provide_context(config);
}

/// Returns the nearest provided [`UiConfig`], or the built-in defaults.
pub fn use_ui_config() -> UiConfig {
    use_context::<UiConfig>().unwrap_or_default()
}

#[component]
/// Scopes a [`UiConfig`] to its children.
pub fn UiConfigProvider(
    /// Defaults applied to descendant floating primitives.
    #[prop(optional)]
    config: UiConfig,
    children: Children,
) -> impl IntoView {
    provide_ui_config(config);
    children()
}
