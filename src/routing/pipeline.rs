//! Ordered translate-name pipeline.
//!
//! # Responsibilities
//! - Hold the stages for one scope in their fixed order
//! - Offer the request to each stage until one handles it
//! - Report which stage (if any) produced the mapping
//!
//! # Design Decisions
//! - Order is part of the pipeline definition, not discovered at runtime
//! - The virtual document root stage runs after `alias` and `userdir`
//! - Built once per scope at load time, immutable afterwards

use std::sync::Arc;

use crate::config::scope::ResolvedScope;
use crate::routing::request::RequestRec;
use crate::routing::stages::{
    AliasStage, DocumentRootStage, Outcome, TranslateStage, UserDirStage, VhostStage,
};
use crate::vhost::DirProbe;

/// Stage names in the order every scope pipeline runs them.
pub const STAGE_ORDER: [&str; 4] = [
    AliasStage::NAME,
    UserDirStage::NAME,
    VhostStage::NAME,
    DocumentRootStage::NAME,
];

#[derive(Debug)]
pub struct Pipeline {
    stages: Vec<Box<dyn TranslateStage>>,
}

impl Pipeline {
    /// Build the standard pipeline for a resolved scope.
    pub fn for_scope(scope: &ResolvedScope, probe: Arc<dyn DirProbe>) -> Self {
        Self {
            stages: vec![
                Box::new(AliasStage::new(scope.aliases.clone())),
                Box::new(UserDirStage::new(scope.userdir.clone())),
                Box::new(VhostStage::new(scope.vhost.clone(), probe)),
                Box::new(DocumentRootStage::new(scope.document_root.clone())),
            ],
        }
    }

    /// Build a pipeline from explicit stages, run in the given order.
    pub fn from_stages(stages: Vec<Box<dyn TranslateStage>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the stages in order. Returns the name of the handling stage, or
    /// `None` if every stage declined.
    pub fn run(&self, req: &mut RequestRec) -> Option<&'static str> {
        for stage in &self.stages {
            if stage.translate(req) == Outcome::Handled {
                req.handled_by = Some(stage.name());
                tracing::trace!(stage = stage.name(), uri = %req.uri, "Translate stage handled request");
                return Some(stage.name());
            }
        }
        None
    }
}
