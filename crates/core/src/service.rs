use crate::catalog::Corpus;
use crate::formatter::ReportContext;
use crate::matcher::{match_clauses, MatchResult};
use crate::profile::BusinessProfile;
use crate::report::{GeneratedReport, ReportGenerator, ReportRequest};
use crate::ComplianceResult;
use std::sync::Arc;
use std::time::Instant;

/// Matching and report orchestration over a shared corpus.
#[derive(Clone, Debug)]
pub struct ComplianceService {
    corpus: Arc<Corpus>,
}

impl ComplianceService {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn match_profile(&self, profile: &BusinessProfile) -> MatchResult {
        match_clauses(profile, &self.corpus)
    }

    /// Match the profile and build the full report context.
    pub fn build_context(&self, profile: &BusinessProfile) -> ReportContext {
        let result = self.match_profile(profile);
        let thresholds = self.corpus.applicable_thresholds(profile);
        ReportContext::build(profile, &result, thresholds)
    }

    /// Build the context and ask `generator` for a report.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceError::Generation` if the generator fails. No fallback report is
    /// produced.
    pub async fn generate_report(
        &self,
        generator: &dyn ReportGenerator,
        profile: &BusinessProfile,
    ) -> ComplianceResult<(ReportContext, GeneratedReport)> {
        let context = self.build_context(profile);
        tracing::info!(
            model = generator.model(),
            requirements = context.requirements.len(),
            "requesting compliance report"
        );

        let request = ReportRequest {
            profile: profile.clone(),
            context,
        };
        let started = Instant::now();
        let mut report = generator.generate(&request).await.map_err(|err| {
            tracing::error!("report generation failed: {err}");
            err
        })?;
        if report.processing_time.is_none() {
            report.processing_time = Some(started.elapsed().as_secs_f64());
        }

        Ok((request.context, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ConnectionStatus, GenerationError};
    use crate::testing::{clause, ClauseExt};
    use crate::ComplianceError;
    use chrono::Utc;
    use regubiz_corpus::FeatureFlag;

    struct EchoGenerator;

    #[async_trait::async_trait]
    impl ReportGenerator for EchoGenerator {
        fn model(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            request: &ReportRequest,
        ) -> Result<GeneratedReport, GenerationError> {
            Ok(GeneratedReport {
                content: format!("{} requirements", request.context.requirements.len()),
                generated_at: Utc::now(),
                model: "echo".into(),
                tokens_used: None,
                processing_time: None,
            })
        }

        async fn test_connection(&self) -> ConnectionStatus {
            ConnectionStatus {
                ok: true,
                model: "echo".into(),
                message: "ok".into(),
            }
        }
    }

    struct FailingGenerator;

    #[async_trait::async_trait]
    impl ReportGenerator for FailingGenerator {
        fn model(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _: &ReportRequest) -> Result<GeneratedReport, GenerationError> {
            Err(GenerationError::ApiStatus {
                status: 500,
                body: "boom".into(),
            })
        }

        async fn test_connection(&self) -> ConnectionStatus {
            ConnectionStatus {
                ok: false,
                model: "failing".into(),
                message: "boom".into(),
            }
        }
    }

    fn service() -> ComplianceService {
        ComplianceService::new(Arc::new(Corpus::from_clauses(vec![
            clause("FIRE_1", "fire_equipment"),
            clause("GAS_1", "gas").requires(FeatureFlag::GasUsage),
        ])))
    }

    #[tokio::test]
    async fn generates_report_from_context() {
        let profile = BusinessProfile::new(100.0, 20, [FeatureFlag::GasUsage]).expect("profile");
        let (context, report) = service()
            .generate_report(&EchoGenerator, &profile)
            .await
            .expect("report");

        assert_eq!(context.requirements.len(), 2);
        assert_eq!(report.content, "2 requirements");
        assert!(report.processing_time.is_some());
    }

    #[tokio::test]
    async fn generation_failure_is_surfaced() {
        let profile = BusinessProfile::new(100.0, 20, []).expect("profile");
        let err = service()
            .generate_report(&FailingGenerator, &profile)
            .await
            .expect_err("failure");
        assert!(matches!(
            err,
            ComplianceError::Generation(GenerationError::ApiStatus { status: 500, .. })
        ));
    }
}
