use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::Applicant;
use crate::config::ScorerConfig;
use crate::errors::{PrequalError, Result};
use crate::payments::PaymentQuote;

use super::excerpt;

/// body posted to the scoring endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest {
    pub quote_code: String,
    pub id_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub vehicle_amount: Decimal,
    /// whole percentage points, 0-100
    pub down_payment_pct: u32,
    pub term_months: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub down_payment_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub financed_amount: Decimal,
    pub client_ip: String,
}

impl ScoringRequest {
    pub fn build(quote_code: &str, applicant: &Applicant, quote: &PaymentQuote, client_ip: &str) -> Self {
        Self {
            quote_code: quote_code.to_string(),
            id_number: applicant.id_number.clone(),
            vehicle_amount: quote.vehicle_amount.as_decimal(),
            down_payment_pct: quote.down_payment_pct.whole_percentage(),
            term_months: quote.term_months,
            down_payment_amount: quote.down_payment_amount.as_decimal(),
            monthly_payment: quote.monthly_payment.as_decimal(),
            financed_amount: quote.financed_amount.as_decimal(),
            client_ip: client_ip.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerMessage {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
}

/// scorer reply; `decision` is free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResponse {
    pub decision: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub messages: Vec<ScorerMessage>,
}

impl ScoringResponse {
    pub fn error_messages(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.error)
            .map(|m| m.message.as_str())
    }
}

/// check status, shape and error flags of a raw scorer reply
pub fn interpret_response(status: u16, body: &str) -> Result<ScoringResponse> {
    if !(200..300).contains(&status) {
        return Err(PrequalError::ScorerRejected { status });
    }

    let response: ScoringResponse = serde_json::from_str(body).map_err(|err| {
        PrequalError::MalformedScorerResponse {
            message: format!("{err}: {}", excerpt(body)),
        }
    })?;

    let errors: Vec<&str> = response.error_messages().collect();
    if !errors.is_empty() {
        return Err(PrequalError::ScorerReportedError {
            message: errors.join("; "),
        });
    }

    if response.decision.trim().is_empty() {
        return Err(PrequalError::MalformedScorerResponse {
            message: "empty decision".to_string(),
        });
    }

    Ok(response)
}

/// remote pre-qualification scorer
pub trait Scorer {
    fn score(&self, request: &ScoringRequest) -> impl Future<Output = Result<ScoringResponse>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpScorer {
    client: reqwest::Client,
    url: String,
}

impl HttpScorer {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &ScorerConfig) -> Self {
        Self::new(client, config.url.clone())
    }
}

impl Scorer for HttpScorer {
    async fn score(&self, request: &ScoringRequest) -> Result<ScoringResponse> {
        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LoanRequest;
    use crate::decimal::{Money, Rate};
    use crate::payments::AmortizationCalculator;

    fn applicant() -> Applicant {
        Applicant {
            id_number: "1710034065".to_string(),
            full_name: "Ana Perez".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let loan = LoanRequest::new(Money::from_major(20_000), Rate::from_percentage(50), 48);
        let quote = PaymentQuote::for_loan(&loan, &AmortizationCalculator::default());
        let request = ScoringRequest::build("AUTO-01", &applicant(), &quote, "190.152.10.4");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["quoteCode"], "AUTO-01");
        assert_eq!(json["idNumber"], "1710034065");
        assert_eq!(json["vehicleAmount"], 20000.0);
        assert_eq!(json["downPaymentPct"], 50);
        assert_eq!(json["termMonths"], 48);
        assert_eq!(json["downPaymentAmount"], 10000.0);
        assert_eq!(json["financedAmount"], 10000.0);
        assert_eq!(json["monthlyPayment"], 281.36);
        assert_eq!(json["clientIp"], "190.152.10.4");
    }

    #[test]
    fn test_successful_response() {
        let body = r#"{"decision": "APROBADO", "reason": "perfil estable", "messages": [{"error": false, "message": "ok"}]}"#;
        let response = interpret_response(200, body).unwrap();

        assert_eq!(response.decision, "APROBADO");
        assert_eq!(response.reason.as_deref(), Some("perfil estable"));
    }

    #[test]
    fn test_non_success_status() {
        let err = interpret_response(503, r#"{"decision": "APROBADO"}"#).unwrap_err();
        assert!(matches!(err, PrequalError::ScorerRejected { status: 503 }));
    }

    #[test]
    fn test_error_flagged_message() {
        let body = r#"{"decision": "APROBADO", "messages": [{"error": true, "message": "cedula no encontrada"}]}"#;
        match interpret_response(200, body) {
            Err(PrequalError::ScorerReportedError { message }) => assert_eq!(message, "cedula no encontrada"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_shapes() {
        assert!(matches!(
            interpret_response(200, "<html>oops</html>"),
            Err(PrequalError::MalformedScorerResponse { .. })
        ));
        assert!(matches!(
            interpret_response(200, r#"{"reason": "x"}"#),
            Err(PrequalError::MalformedScorerResponse { .. })
        ));
        assert!(matches!(
            interpret_response(200, r#"{"decision": "  "}"#),
            Err(PrequalError::MalformedScorerResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_scorer_is_an_error() {
        let scorer = HttpScorer::new(reqwest::Client::new(), "http://127.0.0.1:9/score");
        let loan = LoanRequest::default();
        let quote = PaymentQuote::for_loan(&loan, &AmortizationCalculator::default());
        let request = ScoringRequest::build("AUTO-01", &applicant(), &quote, "127.0.0.1");

        assert!(matches!(scorer.score(&request).await, Err(PrequalError::Transport(_))));
    }
}
