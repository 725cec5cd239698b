#[cfg(test)]
mod tests {
    use crate::error::HarnessError;
    use crate::fixture::{FixtureBuilder, FixtureData, FixtureSet, MAX_FIXTURE_SIZE};
    use crate::seq::{ContainerKind, Order};

    #[test]
    fn test_builds_are_deterministic() -> anyhow::Result<()> {
        for kind in ContainerKind::ALL {
            for order in [Order::Ascending, Order::Descending] {
                let a = FixtureBuilder::build(kind, 64, order)?;
                let b = FixtureBuilder::build(kind, 64, order)?;
                assert_eq!(a, b, "{} {}", kind, order);
                assert_eq!(a.elements().len(), 64);
            }
        }
        Ok(())
    }

    #[test]
    fn test_order_controls_elements() -> anyhow::Result<()> {
        let asc = FixtureBuilder::build(ContainerKind::Vector, 4, Order::Ascending)?;
        let desc = FixtureBuilder::build(ContainerKind::Vector, 4, Order::Descending)?;
        assert_eq!(asc.elements(), vec![1, 2, 3, 4]);
        assert_eq!(desc.elements(), vec![4, 3, 2, 1]);
        Ok(())
    }

    #[test]
    fn test_lazy_fixture_is_fully_forced() -> anyhow::Result<()> {
        let fixture = FixtureBuilder::build(ContainerKind::Lazy, 16, Order::Ascending)?;
        match fixture.data() {
            FixtureData::Lazy(seq) => {
                assert!(seq.is_evaluated());
                assert_eq!(seq.force_all(), 16);
            }
            _ => panic!("expected a lazy payload"),
        }
        Ok(())
    }

    #[test]
    fn test_rejects_bad_sizes() {
        let zero = FixtureBuilder::build(ContainerKind::Array, 0, Order::Ascending);
        assert!(matches!(zero, Err(HarnessError::FixtureConstruction { kind: ContainerKind::Array, .. })));

        let huge = FixtureBuilder::build(ContainerKind::List, MAX_FIXTURE_SIZE + 1, Order::Ascending);
        assert!(matches!(huge, Err(HarnessError::FixtureConstruction { kind: ContainerKind::List, .. })));
    }

    #[test]
    fn test_parallel_and_sequential_sets_agree() -> anyhow::Result<()> {
        let requirements: Vec<_> = ContainerKind::ALL
            .iter()
            .flat_map(|&kind| [(kind, Order::Ascending), (kind, Order::Descending)])
            .collect();
        let sequential = FixtureSet::build(&requirements, 32, false);
        let parallel = FixtureSet::build(&requirements, 32, true);
        assert_eq!(sequential.len(), requirements.len());
        assert_eq!(parallel.len(), requirements.len());
        for &(kind, order) in &requirements {
            let (Some(Ok(a)), Some(Ok(b))) = (sequential.get(kind, order), parallel.get(kind, order)) else {
                panic!("missing fixture for {} {}", kind, order);
            };
            assert_eq!(a, b);
        }
        Ok(())
    }

    #[test]
    fn test_failed_build_is_kept_in_set() {
        let set = FixtureSet::build(&[(ContainerKind::Array, Order::Ascending)], 0, false);
        assert!(matches!(set.get(ContainerKind::Array, Order::Ascending), Some(Err(_))));
        assert!(set.get(ContainerKind::List, Order::Ascending).is_none());
    }
}
