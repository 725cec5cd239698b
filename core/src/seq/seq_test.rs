#[cfg(test)]
mod tests {
    use crate::fixture::FixtureBuilder;
    use crate::seq::{
        ArraySeq, ContainerKind, Deconstruct, Elem, IterPipeline, LazySeq, Order, PersistentList, PersistentVector,
        Reverse, Sort, Traverse,
    };

    fn collect<S: Traverse>(seq: S) -> Vec<Elem> {
        seq.fold(Vec::new(), |mut out, x| {
            out.push(x);
            out
        })
    }

    fn handle<S: Traverse>(kind: ContainerKind, order: Order, size: usize) -> anyhow::Result<S> {
        let fixture = FixtureBuilder::build(kind, size, order)?;
        S::from_fixture(&fixture)
    }

    fn check_traversal<S: Traverse>() -> anyhow::Result<()> {
        let seq: S = handle(S::KIND, Order::Ascending, 6)?;
        let transformed = seq.map(|x| x * 10).filter(|x| x % 20 == 0);
        assert_eq!(collect(transformed), vec![20, 40, 60], "{}", S::KIND);

        let seq: S = handle(S::KIND, Order::Descending, 6)?;
        assert_eq!(seq.head(), Some(6), "{}", S::KIND);
        let seq: S = handle(S::KIND, Order::Descending, 6)?;
        assert_eq!(seq.maximum(), Some(6), "{}", S::KIND);
        Ok(())
    }

    fn check_reorders<S: Reverse + Sort>() -> anyhow::Result<()> {
        let seq: S = handle(S::KIND, Order::Ascending, 5)?;
        assert_eq!(collect(seq.reverse()), vec![5, 4, 3, 2, 1], "{}", S::KIND);
        let seq: S = handle(S::KIND, Order::Descending, 5)?;
        assert_eq!(collect(seq.sort()), vec![1, 2, 3, 4, 5], "{}", S::KIND);
        Ok(())
    }

    fn check_uncons<S: Deconstruct>() -> anyhow::Result<()> {
        let seq: S = handle(S::KIND, Order::Ascending, 3)?;
        let (first, rest) = seq.uncons().ok_or_else(|| anyhow::anyhow!("empty"))?;
        assert_eq!(first, 1);
        let (second, rest) = rest.uncons().ok_or_else(|| anyhow::anyhow!("empty"))?;
        assert_eq!(second, 2);
        let (third, rest) = rest.uncons().ok_or_else(|| anyhow::anyhow!("empty"))?;
        assert_eq!(third, 3);
        assert!(rest.uncons().is_none(), "{}", S::KIND);
        Ok(())
    }

    #[test]
    fn test_traversal_on_every_kind() -> anyhow::Result<()> {
        check_traversal::<ArraySeq>()?;
        check_traversal::<PersistentList>()?;
        check_traversal::<PersistentVector>()?;
        check_traversal::<LazySeq<Elem>>()?;
        check_traversal::<IterPipeline>()?;
        Ok(())
    }

    #[test]
    fn test_reverse_and_sort() -> anyhow::Result<()> {
        check_reorders::<ArraySeq>()?;
        check_reorders::<PersistentList>()?;
        check_reorders::<PersistentVector>()?;
        check_reorders::<LazySeq<Elem>>()?;
        Ok(())
    }

    #[test]
    fn test_uncons_walks_in_order() -> anyhow::Result<()> {
        check_uncons::<ArraySeq>()?;
        check_uncons::<PersistentList>()?;
        check_uncons::<PersistentVector>()?;
        check_uncons::<LazySeq<Elem>>()?;
        check_uncons::<IterPipeline>()?;
        Ok(())
    }

    #[test]
    fn test_handles_do_not_touch_fixture() -> anyhow::Result<()> {
        let fixture = FixtureBuilder::build(ContainerKind::List, 4, Order::Ascending)?;
        let before = fixture.elements();
        let reversed = PersistentList::from_fixture(&fixture)?.reverse();
        assert_eq!(reversed.head(), Some(4));
        let (_, tail) = PersistentList::from_fixture(&fixture)?
            .uncons()
            .ok_or_else(|| anyhow::anyhow!("empty"))?;
        assert_eq!(tail.len(), 3);
        assert_eq!(fixture.elements(), before);
        Ok(())
    }

    #[test]
    fn test_wrong_fixture_kind_is_rejected() -> anyhow::Result<()> {
        let fixture = FixtureBuilder::build(ContainerKind::Array, 3, Order::Ascending)?;
        assert!(PersistentVector::from_fixture(&fixture).is_err());
        assert!(IterPipeline::from_fixture(&fixture).is_err());
        Ok(())
    }

    #[test]
    fn test_array_uncons_advances_offset() {
        let seq = ArraySeq::new(vec![7, 8].into());
        let Some((head, rest)) = seq.uncons() else {
            panic!("expected a head");
        };
        assert_eq!(head, 7);
        assert_eq!(rest.as_slice(), &[8]);
    }

    #[test]
    fn test_vector_len_tracks_offset() {
        let vector = PersistentVector::from_values([1, 2, 3]);
        assert_eq!(vector.len(), 3);
        let Some((_, rest)) = vector.uncons() else {
            panic!("expected a head");
        };
        assert_eq!(rest.len(), 2);
        assert!(!rest.is_empty());
    }

    #[test]
    fn test_kind_and_order_labels() {
        let labels: Vec<_> = ContainerKind::ALL.iter().map(|kind| kind.to_string()).collect();
        assert_eq!(labels, vec!["array", "list", "vector", "lazy", "iterator"]);
        assert_eq!(Order::Descending.values(3), vec![3, 2, 1]);
        assert_eq!(Order::Ascending.label(), "ascending");
    }
}
