use crate::pipeline::{Method, OutputFormat};
use crate::utils::config::PipelineConfig;
use std::path::PathBuf;

/// Arguments for the profile command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProfileArgs {
    /// Script, source file or executable to profile
    pub target: Option<PathBuf>,

    /// Method for a single full pipeline run
    pub method: Method,

    /// Methods for a multi-method run; overrides `method` when non-empty
    pub methods: Vec<Method>,

    /// Output image format
    pub format: OutputFormat,

    /// Pipeline configuration (output dir, tools, interactivity)
    pub config: PipelineConfig,
}

impl Default for ProfileArgs {
    fn default() -> Self {
        Self {
            target: None,
            method: Method::PlainSampling,
            methods: Vec::new(),
            format: OutputFormat::Svg,
            config: PipelineConfig::default(),
        }
    }
}
