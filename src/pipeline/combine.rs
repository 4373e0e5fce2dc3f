//! Combination of several candidate profiles into one visualization.
//!
//! There is no real merge: the first candidate that exists on disk is
//! normalized and rendered alone, later ones are ignored.

use super::models::{CombinedOutcome, Method, OutputFormat, TargetKind};
use super::orchestrator::Pipeline;
use crate::classify::{GraphDescription, ProfileArtifact, RenderedGraph};
use crate::invoke::ToolRunner;
use crate::utils::config::COMBINED_GRAPH_BASE;
use crate::utils::error::PipelineError;
use log::{info, warn};
use std::path::Path;

/// First candidate whose file exists, in the given order
pub fn select_first_existing(candidates: &[Option<ProfileArtifact>]) -> Option<&ProfileArtifact> {
    candidates.iter().flatten().find(|c| c.exists())
}

impl<R: ToolRunner> Pipeline<R> {
    /// Normalize and render the first existing candidate
    ///
    /// **Public** - combination entry point
    ///
    /// # Returns
    /// `Ok(None)` when no candidate exists (including an empty slice)
    pub fn combine(
        &self,
        candidates: &[Option<ProfileArtifact>],
        format: OutputFormat,
    ) -> Result<Option<RenderedGraph>, PipelineError> {
        Ok(self
            .combine_inner(candidates, format)?
            .map(|(_, rendered)| rendered))
    }

    fn combine_inner(
        &self,
        candidates: &[Option<ProfileArtifact>],
        format: OutputFormat,
    ) -> Result<Option<(Option<GraphDescription>, RenderedGraph)>, PipelineError> {
        info!("Combining {} candidate profiles...", candidates.len());

        let Some(selected) = select_first_existing(candidates) else {
            warn!("No candidate profile exists, nothing to combine");
            return Ok(None);
        };

        let usable = candidates.iter().flatten().filter(|c| c.exists()).count();
        if usable > 1 {
            warn!(
                "Only the first profile is visualized; {} later profile(s) ignored",
                usable - 1
            );
        }

        info!("Using profile: {}", selected.path().display());

        if selected.format().is_rendered() {
            return Ok(Some((None, RenderedGraph::new(selected.path()))));
        }

        self.prepare_output_dir()?;

        let base = self.combined_base();
        let graph = self.normalize(selected, &base)?;
        let rendered = self.render(&graph, format, &base)?;

        Ok(Some((Some(graph), rendered)))
    }

    /// Profile the target with every method, then combine the results
    ///
    /// **Public** - backs `--methods`
    ///
    /// A method that fails leaves an empty slot in the candidate list.
    /// A missing target or a failed compilation aborts immediately. Source
    /// targets are compiled once and the binary is shared by every method.
    pub fn run_many(
        &self,
        target: &Path,
        methods: &[Method],
        format: OutputFormat,
    ) -> Result<Option<CombinedOutcome>, PipelineError> {
        if !target.exists() {
            return Err(PipelineError::TargetNotFound(target.to_path_buf()));
        }

        // Python-only methods reject source targets anyway
        let kind = TargetKind::detect(target);
        let compiled = if methods.iter().any(|m| !m.requires_script()) {
            self.build_target(target, kind)?
        } else {
            self.prepare_output_dir()?;
            None
        };
        let mut candidates = Vec::with_capacity(methods.len());

        for (i, method) in methods.iter().enumerate() {
            info!("Profiling with method {}/{}: {}", i + 1, methods.len(), method);

            let profiled = self
                .check_target(target, *method)
                .and_then(|kind| self.profile_built(target, kind, compiled.as_deref(), *method));

            match profiled {
                Ok(artifact) => candidates.push(Some(artifact)),
                Err(err @ PipelineError::TargetNotFound(_)) => return Err(err),
                Err(err) => {
                    warn!("{} produced no profile: {}", method, err);
                    candidates.push(None);
                }
            }
        }

        let Some((graph, rendered)) = self.combine_inner(&candidates, format)? else {
            return Ok(None);
        };

        let viewer = self.viewer(&rendered, graph.as_ref(), &self.combined_base())?;

        Ok(Some(CombinedOutcome {
            candidates,
            graph,
            rendered,
            viewer,
        }))
    }

    fn combined_base(&self) -> String {
        match &self.config().base_name {
            Some(base) => format!("{}_{}", base, COMBINED_GRAPH_BASE),
            None => COMBINED_GRAPH_BASE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_skips_missing_and_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let existing = temp_dir.path().join("perf_profile_script.txt");
        std::fs::write(&existing, "samples").unwrap();

        let candidates = vec![
            None,
            Some(ProfileArtifact::classified(temp_dir.path().join("missing.pstats"))),
            Some(ProfileArtifact::classified(&existing)),
        ];

        let selected = select_first_existing(&candidates).unwrap();
        assert_eq!(selected.path(), existing.as_path());
    }

    #[test]
    fn test_select_empty() {
        assert!(select_first_existing(&[]).is_none());
    }
}
