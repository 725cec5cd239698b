#[cfg(test)]
mod tests {
    use crate::config::{DEFAULT_FIXTURE_SIZE, DEFAULT_MEASUREMENT_ITERATIONS, DEFAULT_WARMUP_ITERATIONS, SessionConfig};
    use crate::error::HarnessError;
    use std::io::Write;
    use std::time::Duration;

    fn write_config(suffix: &str, body: &str) -> anyhow::Result<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
        file.write_all(body.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.warmup_iterations, DEFAULT_WARMUP_ITERATIONS);
        assert_eq!(config.measurement_iterations, DEFAULT_MEASUREMENT_ITERATIONS);
        assert_eq!(config.fixture_size, DEFAULT_FIXTURE_SIZE);
        assert!(config.time_budget_per_scenario().is_none());
        assert!(!config.parallel_fixtures);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml() -> anyhow::Result<()> {
        let file = write_config(
            ".toml",
            "measurement_iterations = 50\nfixture_size = 128\ntime_budget_per_scenario_ms = 250\n",
        )?;
        let config = SessionConfig::from_path(file.path())?;
        assert_eq!(config.measurement_iterations, 50);
        assert_eq!(config.fixture_size, 128);
        assert_eq!(config.warmup_iterations, DEFAULT_WARMUP_ITERATIONS);
        assert_eq!(config.time_budget_per_scenario(), Some(Duration::from_millis(250)));
        Ok(())
    }

    #[test]
    fn test_load_yaml_and_json() -> anyhow::Result<()> {
        let yaml = write_config(".yaml", "warmup_iterations: 3\nparallel_fixtures: true\n")?;
        let config = SessionConfig::from_path(yaml.path())?;
        assert_eq!(config.warmup_iterations, 3);
        assert!(config.parallel_fixtures);

        let json = write_config(".json", r#"{"session_deadline_ms": 1000}"#)?;
        let config = SessionConfig::from_path(json.path())?;
        assert_eq!(config.session_deadline(), Some(Duration::from_secs(1)));
        Ok(())
    }

    #[test]
    fn test_unknown_field_and_extension_are_rejected() -> anyhow::Result<()> {
        let typo = write_config(".toml", "measurement_iteration = 5\n")?;
        assert!(SessionConfig::from_path(typo.path()).is_err());

        let ini = write_config(".ini", "x=1\n")?;
        let err = SessionConfig::from_path(ini.path()).err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("unsupported config format"), "{}", err);
        Ok(())
    }

    #[test]
    fn test_validation() {
        let zero_iterations = SessionConfig::default().with_iterations(10, 0);
        assert!(matches!(zero_iterations.validate(), Err(HarnessError::InvalidConfig(_))));

        let zero_size = SessionConfig::default().with_fixture_size(0);
        assert!(matches!(zero_size.validate(), Err(HarnessError::InvalidConfig(_))));

        let zero_budget = SessionConfig {
            warmup_time_ms: Some(0),
            ..SessionConfig::default()
        };
        assert!(zero_budget.validate().is_err());

        let no_warmup = SessionConfig::default().with_iterations(0, 1);
        assert!(no_warmup.validate().is_ok());
    }

    #[test]
    fn test_invalid_file_values_fail_to_load() -> anyhow::Result<()> {
        let file = write_config(".json", r#"{"fixture_size": 0}"#)?;
        assert!(SessionConfig::from_path(file.path()).is_err());
        Ok(())
    }
}
