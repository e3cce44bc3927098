use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::kinematics::KinematicAnnotator;
use crate::movement::filter_movement;
use crate::types::{AnnotatedFix, RawFix, RetainedFix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Movement filter, then lookback annotation.
    #[default]
    Coalesce,
    /// Adjacent-sample annotation of every raw fix, no dwell aggregation.
    Pairwise,
}

impl PipelineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::Coalesce => "coalesce",
            PipelineMode::Pairwise => "pairwise",
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw fix stream in, annotated track out.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct TrackPipeline {
    config: PipelineConfig,
}

impl TrackPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run<I>(&self, mode: PipelineMode, raw_fixes: I) -> Result<Vec<AnnotatedFix>>
    where
        I: IntoIterator<Item = RawFix>,
    {
        match mode {
            PipelineMode::Coalesce => self.process(raw_fixes),
            PipelineMode::Pairwise => self.process_pairwise(raw_fixes),
        }
    }

    /// Coalesces stationary dwell, then annotates the retained fixes using
    /// the configured lookback window.
    pub fn process<I>(&self, raw_fixes: I) -> Result<Vec<AnnotatedFix>>
    where
        I: IntoIterator<Item = RawFix>,
    {
        let mut raw_fixes = raw_fixes.into_iter().peekable();
        if raw_fixes.peek().is_none() {
            return Ok(Vec::new());
        }

        let mut raw_count = 0usize;
        let retained = filter_movement(raw_fixes.inspect(|_| raw_count += 1));
        let annotated = KinematicAnnotator::new(self.config.look_back).annotate(&retained)?;

        info!(
            mode = %PipelineMode::Coalesce,
            raw = raw_count,
            retained = annotated.len(),
            look_back = %self.config.look_back,
            "track processed"
        );
        Ok(annotated)
    }

    /// Annotates every raw fix against its immediate predecessor. Dwell
    /// fields keep their defaults.
    pub fn process_pairwise<I>(&self, raw_fixes: I) -> Result<Vec<AnnotatedFix>>
    where
        I: IntoIterator<Item = RawFix>,
    {
        let fixes: Vec<RetainedFix> = raw_fixes.into_iter().map(RetainedFix::new).collect();
        if fixes.is_empty() {
            return Ok(Vec::new());
        }

        let annotated = KinematicAnnotator::pairwise().annotate(&fixes)?;
        info!(
            mode = %PipelineMode::Pairwise,
            raw = fixes.len(),
            "track processed"
        );
        Ok(annotated)
    }
}
