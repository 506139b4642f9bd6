//! Settings normalization applied on creation and after every patch.

use crate::settings::{AppendTo, Settings};
use poptip_core::Document;

/// Normalize settings.
///
/// - `arrow` forces `animate_fill` off.
/// - A container resolver is invoked once and replaced by its result.
#[must_use]
pub fn evaluate(mut settings: Settings, doc: &Document) -> Settings {
    if settings.arrow {
        settings.animate_fill = false;
    }
    if let AppendTo::Resolver(resolver) = &settings.append_to {
        let container = resolver.resolve(doc);
        tracing::trace!(?container, "resolved popper container");
        settings.append_to = AppendTo::Element(container);
    }
    settings
}
