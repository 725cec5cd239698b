#[cfg(test)]
mod tests {
    use crate::error::HarnessError;
    use crate::guard::Deferred;
    use crate::registry::{Registry, Workload};
    use crate::seq::{ContainerKind, Order};

    fn constant(kind: ContainerKind, operation: &str, order: Order) -> Workload {
        Workload::new(kind, operation, order, |_| Ok(Deferred::Resolved(0)))
    }

    #[test]
    fn test_register_keeps_order() -> anyhow::Result<()> {
        let mut registry = Registry::new();
        registry.register(constant(ContainerKind::List, "b", Order::Ascending))?;
        registry.register(constant(ContainerKind::Array, "a", Order::Ascending))?;
        registry.register(constant(ContainerKind::List, "a", Order::Descending))?;

        let labels: Vec<_> = registry.iter().map(Workload::label).collect();
        assert_eq!(labels, vec!["list/b", "array/a", "list/a"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.get(ContainerKind::List, "a").is_some());
        assert!(registry.get(ContainerKind::Vector, "a").is_none());
        Ok(())
    }

    #[test]
    fn test_duplicate_pair_is_rejected() -> anyhow::Result<()> {
        let mut registry = Registry::new();
        registry.register(constant(ContainerKind::Lazy, "max", Order::Ascending))?;
        let err = registry.register(constant(ContainerKind::Lazy, "max", Order::Descending));
        assert!(matches!(
            err,
            Err(HarnessError::DuplicateWorkload { kind: ContainerKind::Lazy, ref operation }) if operation == "max"
        ));
        assert_eq!(registry.len(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_registry_is_an_error() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(matches!(registry.ensure_not_empty(), Err(HarnessError::EmptyRegistry)));
    }

    #[test]
    fn test_fixture_requirements_are_deduplicated() -> anyhow::Result<()> {
        let mut registry = Registry::new();
        registry.register(constant(ContainerKind::Array, "a", Order::Ascending))?;
        registry.register(constant(ContainerKind::Array, "b", Order::Ascending))?;
        registry.register(constant(ContainerKind::Array, "c", Order::Descending))?;
        registry.register(constant(ContainerKind::Iterator, "a", Order::Ascending))?;
        assert_eq!(
            registry.fixture_requirements(),
            vec![
                (ContainerKind::Array, Order::Ascending),
                (ContainerKind::Array, Order::Descending),
                (ContainerKind::Iterator, Order::Ascending),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_retain_filters_in_place() -> anyhow::Result<()> {
        let mut registry = Registry::new();
        registry.register(constant(ContainerKind::Array, "fold", Order::Ascending))?;
        registry.register(constant(ContainerKind::List, "fold", Order::Ascending))?;
        registry.register(constant(ContainerKind::List, "sort", Order::Descending))?;
        let lists = registry.retain(|w| w.kind() == ContainerKind::List);
        assert_eq!(lists.len(), 2);
        assert!(lists.iter().all(|w| w.kind() == ContainerKind::List));
        Ok(())
    }

    #[test]
    fn test_workload_metadata() -> anyhow::Result<()> {
        let workload = constant(ContainerKind::Vector, "head", Order::Descending)
            .with_pipeline("first")
            .with_expected(0);
        assert_eq!(workload.pipeline(), Some("first"));
        assert_eq!(workload.expected(), Some(0));
        assert_eq!(workload.order(), Order::Descending);
        assert!(format!("{:?}", workload).contains("head"));
        Ok(())
    }
}
