// Module layout (Clean Architecture style)
// - bootstrap: configuration and router state
// - infrastructure: Postgres repository and tag resolver
// - presentation: HTTP handlers and routing
// - application: ports, use cases and pure services
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;
