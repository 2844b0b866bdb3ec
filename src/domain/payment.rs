//! Payment dispatch failures and their classification.
//!
//! The dispatcher reports a [`PayError`] tree one level deep
//! (failure kind, then parameter-error cause). [`PaymentFailure`] flattens
//! that tree into leaves, each with its own code, so callers can branch
//! on why a payment failed:
//!
//! | Leaf | Code | Caller action |
//! |------|------|---------------|
//! | `ResendSafe` | `invoice_payment_fail_resend_safe` | retry |
//! | `Partial` | `invoice_payment_fail_partial` | wait for events |
//! | `Parameter` | `invoice_payment_fail_parameter_error_<cause>` | fix input |
//! | `PathParameter` | `invoice_payment_fail_path_parameter_error` | abandon |

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Misuse or refusal reported by the library's API layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    ApiMisuse(String),
    FeeRateTooHigh { err: String, feerate: u32 },
    RouteError(String),
    ChannelUnavailable(String),
    IncompatibleShutdownScript(String),
    MonitorUpdateInProgress,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ApiMisuse(err) => write!(f, "API misuse: {err}"),
            ApiError::FeeRateTooHigh { err, feerate } => {
                write!(f, "fee rate {feerate} too high: {err}")
            }
            ApiError::RouteError(err) => write!(f, "invalid route: {err}"),
            ApiError::ChannelUnavailable(err) => write!(f, "channel unavailable: {err}"),
            ApiError::IncompatibleShutdownScript(script) => {
                write!(f, "incompatible shutdown script: {script}")
            }
            ApiError::MonitorUpdateInProgress => f.write_str("channel monitor update in progress"),
        }
    }
}

/// Why sending along the chosen paths failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFailure {
    /// Nothing was sent; a parameter was unusable.
    ParameterError(ApiError),
    /// Nothing was sent; per-path results explain which path was rejected.
    PathParameterError(Vec<Result<(), ApiError>>),
    /// Every path failed before any HTLC was committed.
    AllFailedResendSafe(Vec<ApiError>),
    /// The payment id was already used.
    DuplicatePayment,
    /// Some paths went out, others failed.
    PartialFailure {
        results: Vec<Result<(), ApiError>>,
        payment_id: [u8; 32],
    },
}

/// Failure reported by the payment dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayError {
    /// The invoice cannot be paid as given (expired, missing amount, ...).
    Invoice(String),
    /// No route to the payee was found.
    Routing(String),
    Sending(SendFailure),
}

/// Parameter-error causes that callers distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterCause {
    ApiMisuse,
    FeeRateTooHigh,
    RouteError,
    ChannelUnavailable,
    IncompatibleShutdownScript,
    MonitorUpdateInProgress,
}

impl ParameterCause {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ParameterCause::ApiMisuse => "api_misuse",
            ParameterCause::FeeRateTooHigh => "fee_rate_too_high",
            ParameterCause::RouteError => "route_error",
            ParameterCause::ChannelUnavailable => "channel_unavailable",
            ParameterCause::IncompatibleShutdownScript => "incompatible_shutdown_script",
            ParameterCause::MonitorUpdateInProgress => "monitor_update_in_progress",
        }
    }
}

impl From<&ApiError> for ParameterCause {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::ApiMisuse(_) => ParameterCause::ApiMisuse,
            ApiError::FeeRateTooHigh { .. } => ParameterCause::FeeRateTooHigh,
            ApiError::RouteError(_) => ParameterCause::RouteError,
            ApiError::ChannelUnavailable(_) => ParameterCause::ChannelUnavailable,
            ApiError::IncompatibleShutdownScript(_) => ParameterCause::IncompatibleShutdownScript,
            ApiError::MonitorUpdateInProgress => ParameterCause::MonitorUpdateInProgress,
        }
    }
}

impl fmt::Display for ParameterCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified payment dispatch failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentFailure {
    #[error("invoice not payable: {0}")]
    Invoice(String),

    #[error("no route: {0}")]
    Routing(String),

    #[error("all paths failed, safe to resend: {0}")]
    ResendSafe(String),

    #[error("{cause}: {message}")]
    Parameter {
        cause: ParameterCause,
        message: String,
    },

    #[error("payment partially sent: {0}")]
    Partial(String),

    #[error("path parameter error: {0}")]
    PathParameter(String),

    #[error("duplicate payment")]
    Duplicate,
}

impl PaymentFailure {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            PaymentFailure::Invoice(_) => "invoice_payment_fail_invoice",
            PaymentFailure::Routing(_) => "invoice_payment_fail_routing",
            PaymentFailure::ResendSafe(_) => "invoice_payment_fail_resend_safe",
            PaymentFailure::Parameter { cause, .. } => match cause {
                ParameterCause::ApiMisuse => "invoice_payment_fail_parameter_error_api_misuse",
                ParameterCause::FeeRateTooHigh => {
                    "invoice_payment_fail_parameter_error_fee_rate_too_high"
                }
                ParameterCause::RouteError => "invoice_payment_fail_parameter_error_route_error",
                ParameterCause::ChannelUnavailable => {
                    "invoice_payment_fail_parameter_error_channel_unavailable"
                }
                ParameterCause::IncompatibleShutdownScript => {
                    "invoice_payment_fail_parameter_error_incompatible_shutdown_script"
                }
                ParameterCause::MonitorUpdateInProgress => {
                    "invoice_payment_fail_parameter_error_monitor_update_in_progress"
                }
            },
            PaymentFailure::Partial(_) => "invoice_payment_fail_partial",
            PaymentFailure::PathParameter(_) => "invoice_payment_fail_path_parameter_error",
            PaymentFailure::Duplicate => "invoice_payment_fail_duplicate",
        }
    }

    /// Whether the same invoice can be paid again without risking a double payment.
    #[must_use]
    pub fn is_resend_safe(&self) -> bool {
        !matches!(self, PaymentFailure::Partial(_) | PaymentFailure::Duplicate)
    }
}

impl From<PayError> for PaymentFailure {
    fn from(err: PayError) -> Self {
        match err {
            PayError::Invoice(message) => PaymentFailure::Invoice(message),
            PayError::Routing(message) => PaymentFailure::Routing(message),
            PayError::Sending(failure) => match failure {
                SendFailure::ParameterError(api) => PaymentFailure::Parameter {
                    cause: ParameterCause::from(&api),
                    message: api.to_string(),
                },
                SendFailure::PathParameterError(results) => {
                    PaymentFailure::PathParameter(describe_results(&results))
                }
                SendFailure::AllFailedResendSafe(errors) => PaymentFailure::ResendSafe(
                    errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
                SendFailure::DuplicatePayment => PaymentFailure::Duplicate,
                SendFailure::PartialFailure {
                    results,
                    payment_id,
                } => PaymentFailure::Partial(format!(
                    "payment {}: {}",
                    hex::encode(payment_id),
                    describe_results(&results)
                )),
            },
        }
    }
}

fn describe_results(results: &[Result<(), ApiError>]) -> String {
    let failed: Vec<String> = results
        .iter()
        .enumerate()
        .filter_map(|(path, result)| {
            result
                .as_ref()
                .err()
                .map(|err| format!("path {path}: {err}"))
        })
        .collect();
    format!("{} of {} paths failed ({})", failed.len(), results.len(), failed.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_parameter_cause_has_distinct_code() {
        let errors = [
            ApiError::ApiMisuse("amount".into()),
            ApiError::FeeRateTooHigh {
                err: "cap".into(),
                feerate: 9000,
            },
            ApiError::RouteError("cycle".into()),
            ApiError::ChannelUnavailable("closing".into()),
            ApiError::IncompatibleShutdownScript("0014".into()),
            ApiError::MonitorUpdateInProgress,
        ];

        let mut codes: Vec<&str> = errors
            .into_iter()
            .map(|api| PaymentFailure::from(PayError::Sending(SendFailure::ParameterError(api))).code())
            .collect();
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(codes.len(), 6);
        assert!(codes
            .iter()
            .all(|code| code.starts_with("invoice_payment_fail_parameter_error_")));
    }

    #[test]
    fn test_resend_safe_classification() {
        let failure = PaymentFailure::from(PayError::Sending(SendFailure::AllFailedResendSafe(
            vec![ApiError::ChannelUnavailable("peer offline".into())],
        )));
        assert_eq!(failure.code(), "invoice_payment_fail_resend_safe");
        assert!(failure.is_resend_safe());
        assert!(failure.to_string().contains("peer offline"));
    }

    #[test]
    fn test_partial_failure_is_not_resend_safe() {
        let failure = PaymentFailure::from(PayError::Sending(SendFailure::PartialFailure {
            results: vec![Ok(()), Err(ApiError::MonitorUpdateInProgress)],
            payment_id: [7; 32],
        }));
        assert_eq!(failure.code(), "invoice_payment_fail_partial");
        assert!(!failure.is_resend_safe());
        assert!(failure.to_string().contains("1 of 2 paths failed"));
    }

    #[test]
    fn test_path_parameter_error() {
        let failure = PaymentFailure::from(PayError::Sending(SendFailure::PathParameterError(
            vec![Err(ApiError::RouteError("path too long".into()))],
        )));
        assert_eq!(failure.code(), "invoice_payment_fail_path_parameter_error");
    }

    #[test]
    fn test_routing_and_invoice_errors() {
        assert_eq!(
            PaymentFailure::from(PayError::Routing("no path".into())).code(),
            "invoice_payment_fail_routing"
        );
        assert_eq!(
            PaymentFailure::from(PayError::Invoice("expired".into())).code(),
            "invoice_payment_fail_invoice"
        );
    }
}
