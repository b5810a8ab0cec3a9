use crate::dto::HealthRes;
use regubiz_core::Corpus;

/// Health reporting shared by the REST server and the run binary.
///
/// The service is healthy when the corpus holds at least one clause. An empty corpus is
/// reported as degraded rather than failing the health check, since the process can
/// still serve documentation and sample endpoints.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    pub fn check_health(corpus: &Corpus) -> HealthRes {
        let clause_count = corpus.len();
        if clause_count == 0 {
            HealthRes {
                ok: false,
                status: "degraded".into(),
                message: "Regu-Biz is alive but the regulatory corpus is empty".into(),
                corpus_loaded: false,
                clause_count,
            }
        } else {
            HealthRes {
                ok: true,
                status: "healthy".into(),
                message: "Regu-Biz is alive".into(),
                corpus_loaded: true,
                clause_count,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_corpus_is_degraded() {
        let res = HealthService::check_health(&Corpus::default());
        assert!(!res.ok);
        assert_eq!(res.status, "degraded");
        assert_eq!(res.clause_count, 0);
    }

    #[test]
    fn loaded_corpus_is_healthy() {
        let corpus = Corpus::from_json(
            r#"{"requirements": [{"requirement_id": "A", "category": "general", "content": "x"}]}"#,
        )
        .expect("corpus");
        let res = HealthService::check_health(&corpus);
        assert!(res.ok);
        assert_eq!(res.status, "healthy");
        assert_eq!(res.clause_count, 1);
    }
}
