/*!
 * Tests for error types and conversions
 */

use ttml2srt::errors::{AppError, DocumentError, TimeExpressionError};

#[test]
fn test_timeExpressionError_unrecognized_shouldDisplayExpression() {
    let error = TimeExpressionError::UnrecognizedTimeExpression("4322323".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Unrecognized time expression"));
    assert!(display.contains("4322323"));
}

#[test]
fn test_timeExpressionError_missingTickRate_shouldDisplayExpression() {
    let error = TimeExpressionError::MissingTickRate("520520000t".to_string());
    let display = format!("{}", error);
    assert!(display.contains("tick rate"));
    assert!(display.contains("520520000t"));
}

#[test]
fn test_timeExpressionError_invalidTimestamp_shouldDisplayReason() {
    let error = TimeExpressionError::InvalidTimestamp("negative milliseconds: -1".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid timestamp"));
    assert!(display.contains("-1"));
}

#[test]
fn test_documentError_unsupportedEncoding_shouldDisplayEncoding() {
    let error = DocumentError::UnsupportedEncoding("iso-8859-1".to_string());
    let display = format!("{}", error);
    assert!(display.contains("utf-8"));
    assert!(display.contains("iso-8859-1"));
}

#[test]
fn test_documentError_missingRoot_shouldMentionTtElement() {
    let display = format!("{}", DocumentError::MissingRoot);
    assert!(display.contains("<tt>"));
}

#[test]
fn test_appError_fromTimeExpressionError_shouldWrapCorrectly() {
    let inner = TimeExpressionError::MissingTickRate("10t".to_string());
    let error: AppError = inner.into();
    assert!(matches!(error, AppError::Time(_)));
    assert!(format!("{}", error).contains("Time expression error"));
}

#[test]
fn test_appError_fromDocumentError_shouldWrapCorrectly() {
    let inner = DocumentError::MalformedXml("unexpected end of stream".to_string());
    let error: AppError = inner.into();
    assert!(matches!(error, AppError::Document(_)));
    assert!(format!("{}", error).contains("Malformed XML"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing subtitle");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(format!("{}", error).contains("missing subtitle"));
}

#[test]
fn test_appError_fromAnyhowError_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something else").into();
    assert!(matches!(error, AppError::Unknown(_)));
    assert!(format!("{}", error).contains("something else"));
}
