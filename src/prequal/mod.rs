pub mod fallback;
pub mod verdict;

use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::application::{Applicant, Application, LoanRequest};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::payments::{AmortizationCalculator, PaymentQuote};
use crate::services::{
    http_client, ApplicationRecord, ApplicationStore, CallerIpSource, HttpApplicationStore,
    HttpIpResolver, HttpScorer, Scorer, ScoringRequest, LOOPBACK_PLACEHOLDER,
};
use crate::types::{ApplicationId, DecisionStatus};

pub use fallback::local_decision;
pub use verdict::{classify_decision, map_decision, Verdict};

/// what the result screen needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrequalificationResult {
    pub status: DecisionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ApplicationId>,
}

/// scores a loan remotely, falls back to the local policy, then records the outcome
pub struct PrequalificationDecider<S, P, I> {
    scorer: S,
    store: P,
    ip_source: I,
    calculator: AmortizationCalculator,
    quote_code: String,
    time: SafeTimeProvider,
}

/// decider wired to the HTTP collaborators
pub type HttpDecider = PrequalificationDecider<HttpScorer, HttpApplicationStore, HttpIpResolver>;

impl HttpDecider {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = http_client(&config.network)?;

        Ok(Self::new(
            HttpScorer::from_config(client.clone(), &config.scorer),
            HttpApplicationStore::from_config(client.clone(), &config.store),
            HttpIpResolver::new(client, config.network.ip_lookup_url.clone()),
            AmortizationCalculator::new(config.pricing.annual_rate),
            config.scorer.quote_code.clone(),
            SafeTimeProvider::new(TimeSource::System),
        ))
    }
}

impl<S, P, I> PrequalificationDecider<S, P, I>
where
    S: Scorer,
    P: ApplicationStore,
    I: CallerIpSource,
{
    pub fn new(
        scorer: S,
        store: P,
        ip_source: I,
        calculator: AmortizationCalculator,
        quote_code: impl Into<String>,
        time: SafeTimeProvider,
    ) -> Self {
        Self {
            scorer,
            store,
            ip_source,
            calculator,
            quote_code: quote_code.into(),
            time,
        }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// payment estimate for the loan step
    pub fn quote(&self, loan: &LoanRequest) -> PaymentQuote {
        PaymentQuote::for_loan(loan, &self.calculator)
    }

    /// caller ip, never failing
    async fn caller_ip(&self) -> String {
        match self.ip_source.resolve_ip().await {
            Ok(ip) => ip,
            Err(err) => {
                debug!(error = %err, "caller ip unavailable, using placeholder");
                LOOPBACK_PLACEHOLDER.to_string()
            }
        }
    }

    /// wire request derived from the loan and applicant
    pub async fn build_request(&self, loan: &LoanRequest, applicant: &Applicant) -> ScoringRequest {
        let quote = self.quote(loan);
        let ip = self.caller_ip().await;
        ScoringRequest::build(&self.quote_code, applicant, &quote, &ip)
    }

    /// decide without persisting; scorer failures resolve to the local policy
    pub async fn evaluate(&self, loan: &LoanRequest, applicant: &Applicant) -> Result<Verdict> {
        loan.validate()?;
        let loan = loan.clamped();
        let request = self.build_request(&loan, applicant).await;

        let verdict = match self.scorer.score(&request).await {
            Ok(response) => Verdict::Remote {
                status: classify_decision(&response.decision),
                decision: response.decision,
                reason: response.reason,
            },
            Err(err) => {
                warn!(error = %err, "scorer unavailable, applying local policy");
                Verdict::Fallback {
                    status: local_decision(&loan),
                    cause: err.to_string(),
                }
            }
        };

        info!(
            status = %verdict.status(),
            fallback = verdict.is_fallback(),
            "pre-qualification decided"
        );
        Ok(verdict)
    }

    /// full submission: decide, then persist best-effort
    pub async fn submit(&self, loan: &LoanRequest, applicant: &Applicant) -> Result<PrequalificationResult> {
        let verdict = self.evaluate(loan, applicant).await?;
        let status = verdict.status();

        let record = ApplicationRecord::new(applicant.clone(), loan.clamped(), status, self.time.now());
        let id = match self.store.persist(&record).await {
            Ok(id) => {
                debug!(%id, "application persisted");
                Some(id)
            }
            Err(err) => {
                error!(error = %err, "could not persist application");
                None
            }
        };

        Ok(PrequalificationResult { status, id })
    }

    /// submit a saved draft once every applicant field checks out
    pub async fn submit_application(&self, application: &Application) -> Result<PrequalificationResult> {
        let prepared = application.prepared();
        prepared.validate()?;
        self.submit(&prepared.loan, &prepared.applicant).await
    }

    /// record a later status change, e.g. after manual review
    pub async fn update_status(&self, id: &str, status: DecisionStatus) -> Result<()> {
        self.store.update_status(id, status, self.time.now()).await
    }
}
