//! Transformation pipeline for parsed CDL trees.
//!
//!     A pipeline is an ordered list of named stages. Each stage is a pure
//!     function from one AST to a (possibly new) AST that may attach
//!     diagnostics along the way. Stages never mutate their input and never
//!     consult the clock, random sources or external state to decide tree
//!     shape, so running the same list over the same tree twice produces
//!     structurally identical output.
//!
//! Registry
//!
//!     Stages are registered by name in a static ordered map resolved once
//!     at startup; there is no runtime plugin machinery. The `"full"` preset
//!     expands to the documented built-in ordering in [`FULL_PRESET`].
//!
//! Failure semantics
//!
//!     An unknown stage name or a stage fault halts the remaining stages,
//!     records a diagnostic naming the stage, and returns the tree produced
//!     by the last successful stage together with everything collected so
//!     far. Partial results are preserved, never discarded. The registered
//!     `fail` stage always faults and exists to exercise exactly this path.

pub mod stages;

use crate::cdl::ast::{Diagnostic, Node};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// A stage fault: the stage could not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageError {
    pub stage: String,
    pub message: String,
}

impl StageError {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage `{}` failed: {}", self.stage, self.message)
    }
}

impl std::error::Error for StageError {}

/// A pure AST-to-AST transformation. Diagnostics may be attached; the input
/// tree is never modified.
pub type StageFn = fn(&Node, &mut Vec<Diagnostic>) -> Result<Node, StageError>;

pub struct Stage {
    pub name: &'static str,
    pub description: &'static str,
    run: StageFn,
}

impl Stage {
    pub fn run(&self, ast: &Node, diagnostics: &mut Vec<Diagnostic>) -> Result<Node, StageError> {
        (self.run)(ast, diagnostics)
    }
}

fn fail(_ast: &Node, _diagnostics: &mut Vec<Diagnostic>) -> Result<Node, StageError> {
    Err(StageError::new("fail", "stage configured to fail"))
}

static REGISTRY: Lazy<BTreeMap<&'static str, Stage>> = Lazy::new(|| {
    let mut registry = BTreeMap::new();
    for stage in [
        Stage {
            name: "resolve-references",
            description: "annotate @references with their resolved property paths",
            run: stages::resolve_references::run,
        },
        Stage {
            name: "validate-properties",
            description: "warn on duplicate property names within an entity",
            run: stages::validate_properties::run,
        },
        Stage {
            name: "fail",
            description: "always faults; exercises the pipeline halt path",
            run: fail,
        },
    ] {
        registry.insert(stage.name, stage);
    }
    registry
});

/// The fixed, ordered expansion of the `"full"` preset. Part of the public
/// contract: changing this list is a breaking change.
pub const FULL_PRESET: &[&str] = &["resolve-references", "validate-properties"];

pub fn lookup(name: &str) -> Option<&'static Stage> {
    REGISTRY.get(name)
}

/// All registered stages in name order.
pub fn registered_stages() -> impl Iterator<Item = &'static Stage> {
    REGISTRY.values()
}

/// The stages to run: either a named preset or an explicit ordered list.
///
/// Serializes untagged, so JSON accepts both `"full"` and
/// `["resolve-references"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageList {
    Preset(String),
    Stages(Vec<String>),
}

impl StageList {
    pub fn full() -> Self {
        StageList::Preset("full".to_string())
    }

    pub fn empty() -> Self {
        StageList::Stages(Vec::new())
    }

    /// Expand a preset to concrete stage names. `Err` carries the name of an
    /// unknown preset.
    pub fn expand(&self) -> Result<Vec<String>, String> {
        match self {
            StageList::Preset(name) if name == "full" => {
                Ok(FULL_PRESET.iter().map(|s| s.to_string()).collect())
            }
            StageList::Preset(other) => Err(other.clone()),
            StageList::Stages(names) => Ok(names.clone()),
        }
    }
}

/// Wall-clock duration of one pipeline phase. Informational only; timings
/// never affect output shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: String,
    pub duration_ms: f64,
}

impl StageTiming {
    pub fn new(stage: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            stage: stage.into(),
            duration_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

pub struct PipelineOutcome {
    pub ast: Node,
    pub diagnostics: Vec<Diagnostic>,
    pub timings: Vec<StageTiming>,
}

/// Run the stages in order. Stage *i+1* receives exactly the tree produced
/// by stage *i*; the empty list returns the input unchanged.
pub fn run(ast: &Node, stage_list: &StageList) -> PipelineOutcome {
    let mut diagnostics = Vec::new();
    let mut timings = Vec::new();

    let names = match stage_list.expand() {
        Ok(names) => names,
        Err(unknown) => {
            diagnostics.push(Diagnostic::error(
                format!("unknown pipeline preset `{}`", unknown),
                ast.span(),
                "pipeline",
            ));
            return PipelineOutcome {
                ast: ast.clone(),
                diagnostics,
                timings,
            };
        }
    };

    let mut current = ast.clone();
    for name in names {
        let Some(stage) = lookup(&name) else {
            diagnostics.push(Diagnostic::error(
                format!("unknown pipeline stage `{}`", name),
                current.span(),
                "pipeline",
            ));
            break;
        };
        let start = Instant::now();
        let result = stage.run(&current, &mut diagnostics);
        timings.push(StageTiming::new(stage.name, start.elapsed()));
        match result {
            Ok(next) => current = next,
            Err(error) => {
                let span = current.span();
                diagnostics.push(Diagnostic::error(error.to_string(), span, error.stage));
                break;
            }
        }
    }

    PipelineOutcome {
        ast: current,
        diagnostics,
        timings,
    }
}
