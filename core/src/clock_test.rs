#[cfg(test)]
mod tests {
    use crate::clock;
    use std::time::Duration;

    #[test]
    fn test_resolution_is_finer_than_a_millisecond() -> anyhow::Result<()> {
        let step = clock::resolution().ok_or_else(|| anyhow::anyhow!("clock never advanced"))?;
        assert!(!step.is_zero());
        assert!(step < Duration::from_millis(1), "clock step {:?}", step);
        Ok(())
    }
}
