/// Router Module Index
///
/// Splits the API surface into the two access tiers the application has.
/// Access control is applied explicitly at the module level (via Axum layers),
/// so a handler cannot end up reachable without its tier's gate.

/// Routes accessible to everyone: the published portfolio content, login, and
/// the contact form.
pub mod public;

/// Routes restricted to the site owner. Protected by the `AdminUser` extractor
/// middleware; there is a single admin and no finer-grained roles.
pub mod admin;
