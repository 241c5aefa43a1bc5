use super::OutputFormat;
use crate::parallel::ExecutionStrategy;
use serde::Serialize;

/// Command line flags merged as the highest-priority config layer
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub workers: Option<usize>,
    pub strategy: Option<ExecutionStrategy>,
    /// `--progress` can only switch the bar on
    pub progress: bool,
    pub format: Option<OutputFormat>,
}

impl CliOverrides {
    /// Nested view for figment; unset flags are omitted so they never mask
    /// values from files or the environment
    pub(crate) fn layer(&self) -> Layer {
        Layer {
            parallel: ParallelLayer {
                workers: self.workers,
                strategy: self.strategy,
            },
            output: OutputLayer {
                progress: self.progress.then_some(true),
                format: self.format,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Layer {
    #[serde(skip_serializing_if = "ParallelLayer::is_empty")]
    parallel: ParallelLayer,
    #[serde(skip_serializing_if = "OutputLayer::is_empty")]
    output: OutputLayer,
}

#[derive(Debug, Serialize)]
struct ParallelLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<ExecutionStrategy>,
}

impl ParallelLayer {
    fn is_empty(&self) -> bool {
        self.workers.is_none() && self.strategy.is_none()
    }
}

#[derive(Debug, Serialize)]
struct OutputLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
}

impl OutputLayer {
    fn is_empty(&self) -> bool {
        self.progress.is_none() && self.format.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_overrides_serialize_to_nothing() {
        let value = serde_json::to_value(CliOverrides::default().layer()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_only_set_flags_are_serialized() {
        let overrides = CliOverrides {
            workers: Some(4),
            progress: true,
            ..CliOverrides::default()
        };
        let value = serde_json::to_value(overrides.layer()).unwrap();
        assert_eq!(
            value,
            json!({"parallel": {"workers": 4}, "output": {"progress": true}})
        );
    }
}
