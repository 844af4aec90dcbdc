//! Tests for weight configuration.

use std::io::Write;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        bound_mode = "fixed"
        fixed_bounds = [0.2, 5]
        tolerance = 0.0001

        [classes.authority]
        members = [125, 126]
        bounds = [3.0, 8.0]

        [classes.commodity]
        members = [342, 410, 740]
        bounds = [1.0, 4.0]

        [classes.numeral]
        id_range = [1, 9]
        min_frequency = 3

        [[hierarchy]]
        dominant = "authority"
        dominated = "commodity"
        margin = 0.75
        dominated_cap = 50

        [efficiency]
        enabled = true
        top_n = 10

        [termination]
        seconds_spent_limit = 30
    "#;

    let config = WeightConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.bound_mode, BoundMode::Fixed);
    assert_eq!(config.fixed_bounds, Bounds::new(0.2, 5.0));
    assert_eq!(config.tolerance, 0.0001);
    assert_eq!(config.classes.authority.members.len(), 2);
    assert_eq!(config.classes.commodity.bounds, Some(Bounds::new(1.0, 4.0)));
    assert_eq!(config.classes.numeral.id_range, Some((SignId(1), SignId(9))));
    assert_eq!(config.classes.numeral.min_frequency, 3);
    // Omitted numeral bounds fall back to the rule's default.
    assert_eq!(
        config.classes.numeral.bounds,
        Some(default_bounds(SignClass::Numeral))
    );
    assert_eq!(config.hierarchy.len(), 1);
    assert_eq!(config.hierarchy[0].margin, 0.75);
    assert_eq!(config.hierarchy[0].dominated_cap, Some(50));
    assert!(config.hierarchy[0].exclude_modifiers);
    assert!(config.efficiency.enabled);
    assert_eq!(config.efficiency.slack, 1.0);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        bound_mode: free
        classes:
          authority:
            members: [125, 126]
            bounds: [3.0, 8.0]
        hierarchy:
          - dominant: authority
            dominated: standard
        termination:
          millis_spent_limit: 250
    "#;

    let config = WeightConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.bound_mode, BoundMode::Free);
    assert!(config.classes.authority.members.contains(&SignId(125)));
    assert_eq!(config.hierarchy[0].margin, DEFAULT_MARGIN);
    assert_eq!(config.hierarchy[0].dominated, SignClass::Standard);
    assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
}

#[test]
fn test_empty_document_gives_defaults() {
    let config = WeightConfig::from_toml_str("").unwrap();
    assert_eq!(config.bound_mode, BoundMode::Free);
    assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
    assert!(config.classes.authority.members.contains(&SignId(125)));
    assert_eq!(config.hierarchy.len(), 1);
    assert_eq!(config.premiums[0].name(), "authority_over_commodity");
    assert_eq!(config.time_limit(), None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_class_is_rejected() {
    let toml = r#"
        [[hierarchy]]
        dominant = "ruler"
        dominated = "commodity"
    "#;
    assert!(matches!(
        WeightConfig::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_validate_rejects_bad_tolerance() {
    let config = WeightConfig::new().with_tolerance(0.0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_rejects_bad_fixed_bounds() {
    let mut config = WeightConfig::new().with_bound_mode(BoundMode::Fixed);
    config.fixed_bounds = Bounds::new(4.0, 1.0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_builder() {
    let config = WeightConfig::new()
        .with_authority([125, 126], Bounds::new(3.0, 8.0))
        .with_commodity([342], Bounds::new(1.0, 4.0))
        .with_hierarchy(vec![HierarchyRule::new(
            SignClass::Authority,
            SignClass::Commodity,
        )
        .with_margin(1.0)
        .with_dominated_cap(5)])
        .with_termination_seconds(60);

    assert_eq!(config.classes.authority.members.len(), 2);
    assert_eq!(config.hierarchy[0].dominated_cap, Some(5));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
}

#[test]
fn test_numeral_rule_matches() {
    let rule = NumeralRule::default();
    assert!(rule.matches(SignId(3), 1));
    assert!(!rule.matches(SignId(50), 10));

    let frequent_only = NumeralRule {
        id_range: None,
        min_frequency: 100,
        bounds: None,
    };
    assert!(frequent_only.matches(SignId(740), 120));
    assert!(!frequent_only.matches(SignId(740), 99));
}

#[test]
fn test_load_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("weights.yaml");
    let mut file = std::fs::File::create(&yaml_path).unwrap();
    writeln!(file, "tolerance: 0.01").unwrap();
    assert_eq!(WeightConfig::load(&yaml_path).unwrap().tolerance, 0.01);

    let toml_path = dir.path().join("weights.toml");
    std::fs::write(&toml_path, "tolerance = 0.02\n").unwrap();
    assert_eq!(WeightConfig::load(&toml_path).unwrap().tolerance, 0.02);

    assert!(matches!(
        WeightConfig::load(dir.path().join("missing.toml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_time_limit_saturates() {
    let config = WeightConfig::new().with_termination_seconds(u64::MAX / 10);
    assert_eq!(config.time_limit(), Some(Duration::from_secs(u64::MAX / 10)));

    let termination = TerminationConfig {
        seconds_spent_limit: Some(u64::MAX),
        millis_spent_limit: Some(u64::MAX),
    };
    assert_eq!(termination.time_limit(), Some(Duration::MAX));
}
