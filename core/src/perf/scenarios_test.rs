#[cfg(test)]
mod tests {
    use crate::fixture::{FixtureBuilder, MAX_FIXTURE_SIZE};
    use crate::perf::scenarios::{self, PATTERN_MAX, REVERSE_HEAD, SORT_HEAD, transformed_max};
    use crate::seq::{ContainerKind, Order};

    #[test]
    fn test_every_entry_meets_its_expected_value() -> anyhow::Result<()> {
        for size in [1, 2, 5, 64] {
            let registry = scenarios::catalog(size)?;
            for workload in &registry {
                let fixture = FixtureBuilder::build(workload.kind(), size, workload.order())?;
                let value = workload.evaluate(&fixture)?;
                assert_eq!(Some(value), workload.expected(), "{} at size {}", workload.label(), size);
            }
        }
        Ok(())
    }

    #[test]
    fn test_iterator_omits_reorders() -> anyhow::Result<()> {
        let registry = scenarios::catalog(8)?;
        assert!(registry.get(ContainerKind::Iterator, REVERSE_HEAD).is_none());
        assert!(registry.get(ContainerKind::Iterator, SORT_HEAD).is_none());
        assert!(registry.get(ContainerKind::Iterator, PATTERN_MAX).is_some());
        for kind in [ContainerKind::Array, ContainerKind::List, ContainerKind::Vector, ContainerKind::Lazy] {
            assert!(registry.get(kind, REVERSE_HEAD).is_some(), "{}", kind);
        }
        assert_eq!(registry.len(), 4 * 7 + 5);
        Ok(())
    }

    #[test]
    fn test_sort_runs_on_descending_fixtures() -> anyhow::Result<()> {
        let registry = scenarios::catalog(8)?;
        for workload in &registry {
            let expected = if workload.operation() == SORT_HEAD {
                Order::Descending
            } else {
                Order::Ascending
            };
            assert_eq!(workload.order(), expected, "{}", workload.label());
        }
        Ok(())
    }

    #[test]
    fn test_pattern_max_handles_deep_list() -> anyhow::Result<()> {
        let registry = scenarios::catalog(500)?;
        let workload = registry
            .get(ContainerKind::List, PATTERN_MAX)
            .ok_or_else(|| anyhow::anyhow!("missing list/pattern_max"))?;
        let fixture = FixtureBuilder::build(ContainerKind::List, 500, Order::Ascending)?;
        assert_eq!(workload.evaluate(&fixture)?, 500);
        Ok(())
    }

    #[test]
    fn test_transformed_max() {
        assert_eq!(transformed_max(5), 12);
        assert_eq!(transformed_max(4), 8);
        assert_eq!(transformed_max(1), 4);
    }

    #[test]
    fn test_catalog_rejects_out_of_range_sizes() {
        assert!(scenarios::catalog(0).is_err());
        assert!(scenarios::catalog(MAX_FIXTURE_SIZE + 1).is_err());
        assert!(scenarios::catalog(usize::MAX).is_err());
    }

    #[test]
    fn test_catalog_accepts_largest_fixture_size() -> anyhow::Result<()> {
        let registry = scenarios::catalog(MAX_FIXTURE_SIZE)?;
        let n = i64::try_from(MAX_FIXTURE_SIZE)?;
        let entry = registry
            .get(ContainerKind::Array, scenarios::MAP_FILTER_MAP_MAX)
            .ok_or_else(|| anyhow::anyhow!("missing array entry"))?;
        assert_eq!(entry.expected(), Some(transformed_max(n)));
        assert_eq!(transformed_max(n), 2 * n);
        Ok(())
    }
}
