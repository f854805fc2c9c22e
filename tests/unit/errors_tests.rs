/*!
 * Tests for error type display and conversion
 */

use vertaalbrug::errors::{AppError, ConfigError, DegradeReason, GatewayError, ProviderError};

#[test]
fn test_configError_display_shouldNameTheKey() {
    let error = ConfigError::MissingKey("DEEPL_API_KEY");
    assert_eq!(
        error.to_string(),
        "Missing required configuration: DEEPL_API_KEY"
    );
}

#[test]
fn test_gatewayError_display_shouldDistinguishVariants() {
    let unavailable = GatewayError::Unavailable("timed out".to_string());
    assert!(unavailable.to_string().contains("unavailable"));

    let api = GatewayError::Api {
        status: 403,
        message: "forbidden".to_string(),
    };
    assert!(api.to_string().contains("403"));

    let malformed = GatewayError::MalformedResponse("empty translations array".to_string());
    assert!(malformed.to_string().contains("Malformed"));
}

#[test]
fn test_degradeReason_fromProviderError_shouldWrap() {
    let reason: DegradeReason =
        ProviderError::ConnectionError("refused".to_string()).into();
    assert!(matches!(reason, DegradeReason::Backend(_)));
    assert!(reason.to_string().contains("refused"));
}

#[test]
fn test_appError_fromGatewayError_shouldWrap() {
    let error: AppError = GatewayError::Unavailable("down".to_string()).into();
    assert!(matches!(error, AppError::Gateway(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(_)));
    assert!(error.to_string().contains("something odd"));
}
