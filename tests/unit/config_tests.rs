// Configuration loading tests

use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tilemark::config::WatermarkConfig;

#[test]
fn test_defaults_match_document_tool_behaviour() {
    let config = WatermarkConfig::default();

    assert_eq!(config.text, "仅供xxx使用，他用无效");
    assert_eq!(config.pre_rotate_degrees, 90.0);
    assert_eq!(config.tile_rotation_degrees, -30.0);
    assert_eq!(config.fill_color, "#FF000080");
    assert_eq!(config.font_size, None);
    assert_eq!(config.font_size_divisor, 25);
    assert_eq!(config.tile_margin, 10);
    assert_eq!(config.output_quality, 98);
    assert_eq!(config.output_dpi, 300);
    assert_eq!(config.font_paths.len(), 4);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_yaml_keeps_remaining_defaults() {
    let yaml = r#"
text: "COPY"
pre_rotate_degrees: 0
font_paths:
  - /opt/fonts/custom.ttf
"#;
    let config = WatermarkConfig::from_yaml_with_env(yaml).unwrap();

    assert_eq!(config.text, "COPY");
    assert_eq!(config.pre_rotate_degrees, 0.0);
    assert_eq!(config.font_paths, vec![PathBuf::from("/opt/fonts/custom.ttf")]);
    assert_eq!(config.tile_rotation_degrees, -30.0);
    assert_eq!(config.output_quality, 98);
}

#[test]
fn test_env_substitution_in_text() {
    std::env::set_var("TILEMARK_UNIT_RECIPIENT", "ACME Bank");
    let yaml = "text: \"For ${TILEMARK_UNIT_RECIPIENT} only\"\n";

    let config = WatermarkConfig::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.text, "For ACME Bank only");
}

#[test]
fn test_unset_env_variable_is_an_error() {
    let yaml = "text: \"${TILEMARK_UNIT_NEVER_SET_VARIABLE}\"\n";

    let err = WatermarkConfig::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("TILEMARK_UNIT_NEVER_SET_VARIABLE"));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "fill_color: \"#00FF0040\"").unwrap();
    writeln!(file, "horizontal_spacing: 150").unwrap();

    let config = WatermarkConfig::from_file(file.path()).unwrap();
    assert_eq!(config.fill_color, "#00FF0040");
    assert_eq!(config.horizontal_spacing, Some(150));
    assert_eq!(config.vertical_spacing, None);
}

#[test]
fn test_from_missing_file() {
    let result = WatermarkConfig::from_file("/nonexistent/tilemark.yaml");
    assert!(result.is_err());
}

#[test]
fn test_validate_rejects_bad_values() {
    let bad_color = WatermarkConfig {
        fill_color: "red".to_string(),
        ..Default::default()
    };
    assert!(bad_color.validate().is_err());

    let bad_quality = WatermarkConfig {
        output_quality: 0,
        ..Default::default()
    };
    assert!(bad_quality.validate().is_err());

    let bad_angle = WatermarkConfig {
        tile_rotation_degrees: f32::NAN,
        ..Default::default()
    };
    assert!(bad_angle.validate().is_err());

    let bad_spacing = WatermarkConfig {
        vertical_spacing: Some(0),
        ..Default::default()
    };
    assert!(bad_spacing.validate().is_err());
}

#[test]
fn test_font_size_scales_with_shorter_side() {
    let config = WatermarkConfig::default();
    assert_eq!(config.font_size_for(400, 600), 16);
    assert_eq!(config.font_size_for(2480, 3508), 99);
    // tiny images still get a 1px font
    assert_eq!(config.font_size_for(10, 10), 1);

    let fixed = WatermarkConfig {
        font_size: Some(42),
        ..Default::default()
    };
    assert_eq!(fixed.font_size_for(400, 600), 42);
}
