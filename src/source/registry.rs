//! Source registry: data-driven capture-source registration.
//!
//! The registry is the single source of truth for the capture adapters this
//! process can instantiate: display names, descriptions, and factory
//! functions. It is built once on first use and read-only thereafter; host
//! selection dialogs and the acquisition CLI are driven from this data.

use crate::source::novena;
use crate::source::DataSource;
use std::sync::OnceLock;

/// Metadata for a registered capture source, including its factory.
pub struct SourceDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub factory: fn() -> Box<dyn DataSource>,
}

impl SourceDescriptor {
    /// Instantiate the source; the session is established by `init()`.
    pub fn create(&self) -> Box<dyn DataSource> {
        (self.factory)()
    }
}

/// Build the registry with all known capture sources.
fn build_registry() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor {
            name: novena::SOURCE_NAME,
            description: novena::SOURCE_DESCRIPTION,
            factory: || Box::new(novena::NovenaSource::new()),
        },
        #[cfg(any(test, feature = "mock-link"))]
        SourceDescriptor {
            name: "Mock capture",
            description: "Synthesized ramp data, no hardware required",
            factory: || {
                Box::new(novena::NovenaSource::with_link(Box::new(
                    crate::backend::MockLink::new(),
                )))
            },
        },
    ]
}

/// The process-wide registry, initialized on first access.
pub fn registry() -> &'static [SourceDescriptor] {
    static REGISTRY: OnceLock<Vec<SourceDescriptor>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

/// Look a source up by its registered name.
pub fn find_descriptor(name: &str) -> Option<&'static SourceDescriptor> {
    registry().iter().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_novena_source() {
        let descriptor = find_descriptor(novena::SOURCE_NAME).expect("novena source registered");
        assert_eq!(descriptor.description, novena::SOURCE_DESCRIPTION);
    }

    #[test]
    fn test_unknown_name_is_absent() {
        assert!(find_descriptor("No such source").is_none());
    }

    #[test]
    fn test_factory_builds_source_with_fixed_metadata() {
        let descriptor = find_descriptor("Mock capture").expect("mock source registered in tests");
        let source = descriptor.create();
        assert_eq!(source.input_count(), novena::INPUT_COUNT);
        assert_eq!(source.sampling_rate(), novena::SAMPLING_RATE_HZ);
        assert_eq!(source.unit_per_volt(), novena::UNITS_PER_VOLT);
    }

    #[test]
    fn test_registry_is_stable_across_calls() {
        let first = registry().as_ptr();
        let second = registry().as_ptr();
        assert_eq!(first, second);
    }
}
