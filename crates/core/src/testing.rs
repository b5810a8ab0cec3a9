//! Clause builders shared by unit tests.

use regubiz_corpus::{Applicability, Band, ClauseData, FeatureFlag, SourceRef};
use regubiz_types::{ClauseId, NonEmptyText};

pub(crate) fn clause(id: &str, category: &str) -> ClauseData {
    ClauseData {
        id: ClauseId::parse(id).expect("valid clause id"),
        category: category.to_string(),
        topic: category.to_string(),
        title: format!("{id} title"),
        content: NonEmptyText::new(format!("Requirement text for {id}.")).expect("content"),
        applicability: Applicability::default(),
        source: SourceRef {
            chapter: 5,
            section: "5.1".into(),
        },
        standards: Vec::new(),
        certifications: Vec::new(),
    }
}

pub(crate) trait ClauseExt {
    fn topic(self, topic: &str) -> Self;
    fn area(self, min: Option<f64>, max: Option<f64>) -> Self;
    fn capacity(self, min: Option<u32>, max: Option<u32>) -> Self;
    fn requires(self, flag: FeatureFlag) -> Self;
    fn chapter(self, chapter: u32) -> Self;
}

impl ClauseExt for ClauseData {
    fn topic(mut self, topic: &str) -> Self {
        self.topic = topic.to_string();
        self
    }

    fn area(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.applicability.area = Band::new(min, max);
        self
    }

    fn capacity(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.applicability.capacity = Band::new(min, max);
        self
    }

    fn requires(mut self, flag: FeatureFlag) -> Self {
        self.applicability.required_features.push(flag);
        self.applicability.required_features.sort();
        self
    }

    fn chapter(mut self, chapter: u32) -> Self {
        self.source.chapter = chapter;
        self
    }
}
