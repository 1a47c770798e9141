//! Construction-and-one-forward-pass smoke tests for the four model roles.
//!
//! The unimodal models are exercised independently of each other, so a
//! broken image model still lets the audio and text models be checked. The
//! fusion model consumes their features and is reported as skipped when
//! any of them is missing. Every failing role ends up in the step message.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::check::{Check, Outcome};
use crate::consts::*;
use crate::errors::CheckError;

pub use harness::{ModelHarness, PythonModelHarness};
pub mod harness;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    Image,
    Audio,
    Text,
    Fusion,
}

impl ModelRole {
    pub const ALL: [ModelRole; 4] = [
        ModelRole::Image,
        ModelRole::Audio,
        ModelRole::Text,
        ModelRole::Fusion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ModelRole::Image => "Image CNN",
            ModelRole::Audio => "Audio CNN",
            ModelRole::Text => "Text CNN",
            ModelRole::Fusion => "Fusion Network",
        }
    }

    pub fn is_unimodal(&self) -> bool {
        !matches!(self, ModelRole::Fusion)
    }
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Synthetic input for one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputSpec {
    /// Standard normal floats.
    Randn { shape: Vec<usize> },
    /// Integer token ids in `[0, high)`.
    Randint { high: i64, shape: Vec<usize> },
    /// Feature outputs of earlier roles, passed positionally.
    Features { from: Vec<ModelRole> },
}

impl InputSpec {
    fn batch(&self) -> usize {
        match self {
            InputSpec::Randn { shape } | InputSpec::Randint { shape, .. } => {
                shape.first().copied().unwrap_or(1)
            }
            InputSpec::Features { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSpec {
    pub role: ModelRole,
    pub module: String,
    pub class: String,
    pub kwargs: Map<String, Value>,
    pub input: InputSpec,
}

impl ModelSpec {
    fn new(role: ModelRole, module: &str, class: &str, num_classes: usize, input: InputSpec) -> Self {
        let mut kwargs = Map::new();
        kwargs.insert("num_classes".to_string(), Value::from(num_classes));
        Self {
            role,
            module: module.to_string(),
            class: class.to_string(),
            kwargs,
            input,
        }
    }

    fn with_kwarg(mut self, key: &str, value: Value) -> Self {
        self.kwargs.insert(key.to_string(), value);
        self
    }

    /// Scores must come back as `[batch, num_classes]`.
    pub fn expected_scores(&self, num_classes: usize) -> Vec<usize> {
        vec![self.input.batch(), num_classes]
    }
}

/// What the harness is asked to build and run, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmokePlan {
    pub source_dir: PathBuf,
    pub num_classes: usize,
    pub models: Vec<ModelSpec>,
}

impl SmokePlan {
    pub fn standard(source_dir: PathBuf, num_classes: usize) -> Self {
        let models = vec![
            ModelSpec::new(
                ModelRole::Image,
                "models.image_cnn",
                "ImageCNN",
                num_classes,
                InputSpec::Randn {
                    shape: IMAGE_INPUT_SHAPE.to_vec(),
                },
            )
            .with_kwarg("pretrained", Value::Bool(false)),
            ModelSpec::new(
                ModelRole::Audio,
                "models.audio_cnn",
                "AudioCNN",
                num_classes,
                InputSpec::Randn {
                    shape: vec![1, 1, AUDIO_SAMPLE_RATE * AUDIO_SECONDS],
                },
            ),
            ModelSpec::new(
                ModelRole::Text,
                "models.text_cnn",
                "TextCNN",
                num_classes,
                InputSpec::Randint {
                    high: TEXT_VOCAB_SIZE,
                    shape: vec![1, TEXT_SEQUENCE_LENGTH],
                },
            ),
            ModelSpec::new(
                ModelRole::Fusion,
                "models.fusion_network",
                "MultimodalFusion",
                num_classes,
                InputSpec::Features {
                    from: vec![ModelRole::Image, ModelRole::Audio, ModelRole::Text],
                },
            ),
        ];

        Self {
            source_dir,
            num_classes,
            models,
        }
    }
}

/// Per-role result of one forward pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleReport {
    #[serde(default)]
    pub output_shape: Option<Vec<usize>>,
    #[serde(default)]
    pub feature_shape: Option<Vec<usize>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RoleReport {
    pub fn ok(output_shape: Vec<usize>, feature_shape: Option<Vec<usize>>) -> Self {
        Self {
            output_shape: Some(output_shape),
            feature_shape,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Set when the probe could not start at all, e.g. torch is missing.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub roles: BTreeMap<ModelRole, RoleReport>,
}

/// Checks one role's report against the plan's post-conditions.
pub fn verify_role(spec: &ModelSpec, report: Option<&RoleReport>, num_classes: usize) -> Result<(), String> {
    let report = report.ok_or_else(|| "no result reported".to_string())?;
    if let Some(error) = &report.error {
        return Err(error.clone());
    }

    let expected = spec.expected_scores(num_classes);
    match &report.output_shape {
        Some(shape) if *shape == expected => {}
        Some(shape) => {
            return Err(format!(
                "scores have shape {:?}, expected {:?}",
                shape, expected
            ));
        }
        None => return Err("returned no score tensor".to_string()),
    }

    if spec.role.is_unimodal() {
        match report.feature_shape.as_deref() {
            Some([batch, ..]) if *batch == expected[0] => {}
            Some(shape) => {
                return Err(format!(
                    "features have shape {:?}, expected batch size {}",
                    shape, expected[0]
                ));
            }
            None => return Err("returned no feature tensor".to_string()),
        }
    }
    Ok(())
}

pub struct ModelSmokeTester<M> {
    harness: M,
    plan: SmokePlan,
}

impl<M: ModelHarness> ModelSmokeTester<M> {
    pub fn new(harness: M, plan: SmokePlan) -> Self {
        Self { harness, plan }
    }
}

impl<M: ModelHarness> Check for ModelSmokeTester<M> {
    fn name(&self) -> &str {
        STEP_MODELS
    }

    fn run(&self) -> Result<Outcome, CheckError> {
        let report = self.harness.probe(&self.plan)?;
        if let Some(error) = report.error {
            return Err(CheckError::collaborator(format!("Model tests failed: {}", error)));
        }

        let mut outcome = Outcome::passed();
        let mut failures = Vec::new();
        for spec in &self.plan.models {
            match verify_role(spec, report.roles.get(&spec.role), self.plan.num_classes) {
                Ok(()) => {
                    log::debug!("{} passed its forward pass", spec.role);
                    outcome = outcome.note(format!("{} initialized and forward pass OK", spec.role));
                }
                Err(reason) => {
                    log::warn!("{} failed: {}", spec.role, reason);
                    failures.push(format!("{}: {}", spec.role, reason));
                }
            }
        }

        if !failures.is_empty() {
            return Err(CheckError::collaborator(format!(
                "Model tests failed: {}",
                failures.join("; ")
            )));
        }
        Ok(outcome.note("All model tests passed"))
    }
}
