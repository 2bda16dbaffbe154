//! StressChaos resource types and the stressor compiler
//!
//! Stressors are compiled into an argument string for `stress-ng`. The
//! string is handed to whatever launches the tool inside the target; nothing
//! here runs it.

use crate::{parse_quantity, CrdError, ObjectMeta, Result, TypeMeta};
use serde::{Deserialize, Serialize};

/// StressChaos resource generating stress on selected pods
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StressChaos {
    #[serde(flatten)]
    pub type_meta: TypeMeta,

    #[serde(default)]
    pub metadata: ObjectMeta,

    pub spec: StressChaosSpec,

    /// Status written by the chaos controller; not interpreted here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

impl StressChaos {
    /// Create a StressChaos in a namespace
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        spec: StressChaosSpec,
    ) -> Self {
        Self {
            type_meta: TypeMeta::stress_chaos(),
            metadata: ObjectMeta::with_namespace(name, namespace),
            spec,
            status: None,
        }
    }
}

/// StressChaos specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StressChaosSpec {
    /// Which of the selected pods to inject into
    pub mode: PodMode,

    /// Count or percentage for the fixed/percent modes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Pod selector, passed through untouched
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub selector: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stressors: Option<Stressors>,

    /// Raw stress-ng stressors; wins over `stressors` when both are set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stressng_stressors: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl StressChaosSpec {
    /// Raw stress-ng stressors, when set to something other than blanks
    pub fn raw_stressors(&self) -> Option<&str> {
        self.stressng_stressors
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
    }

    /// Arguments for the stress tool
    ///
    /// Raw stressors are used as is. Otherwise the structured stressors are
    /// compiled.
    pub fn stress_args(&self) -> Result<String> {
        if let Some(raw) = self.raw_stressors() {
            return Ok(raw.to_string());
        }

        match &self.stressors {
            Some(stressors) => stressors.normalize(),
            None => Err(CrdError::MissingField("spec.stressors".to_string())),
        }
    }
}

/// Pod selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PodMode {
    #[default]
    One,
    All,
    Fixed,
    FixedPercent,
    RandomMaxPercent,
}

/// Stressors to apply; one or both may be set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Stressors {
    #[serde(rename = "memory", skip_serializing_if = "Option::is_none")]
    pub memory_stressor: Option<MemoryStressor>,

    #[serde(rename = "cpu", skip_serializing_if = "Option::is_none")]
    pub cpu_stressor: Option<CpuStressor>,
}

/// Virtual memory stressor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MemoryStressor {
    pub workers: u32,

    /// Bytes per worker: a size with unit, or a percentage of total memory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Extra stress-ng options, passed through in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// CPU stressor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CpuStressor {
    pub workers: u32,

    /// Load percentage per worker, 0 (sleep) to 100 (full)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<u32>,

    /// Extra stress-ng options, passed through in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Stressors {
    /// Compile the stressors into a stress-ng argument string
    ///
    /// The memory block is always emitted before the CPU block. An invalid
    /// memory size fails the whole compilation.
    pub fn normalize(&self) -> Result<String> {
        let mut args = String::new();

        if let Some(memory) = &self.memory_stressor {
            args.push_str(&format!(" --vm {} --vm-keep", memory.workers));
            if let Some(size) = memory.size.as_deref().filter(|s| !s.is_empty()) {
                // Percentages go through verbatim, stress-ng understands them.
                let size = parse_quantity(size)?;
                args.push_str(&format!(" --vm-bytes {}", size));
            }
            push_options(&mut args, &memory.options);
        }

        if let Some(cpu) = &self.cpu_stressor {
            args.push_str(&format!(" --cpu {}", cpu.workers));
            if let Some(load) = cpu.load {
                args.push_str(&format!(" --cpu-load {}", load));
            }
            push_options(&mut args, &cpu.options);
        }

        Ok(args)
    }

    /// Admission-style checks; `normalize` does not require them
    pub fn validate(&self) -> Result<()> {
        if self.memory_stressor.is_none() && self.cpu_stressor.is_none() {
            return Err(CrdError::MissingField(
                "spec.stressors.memory or spec.stressors.cpu".to_string(),
            ));
        }

        if let Some(load) = self.cpu_stressor.as_ref().and_then(|cpu| cpu.load) {
            if load > 100 {
                return Err(CrdError::InvalidFieldValue {
                    field: "spec.stressors.cpu.load".to_string(),
                    message: format!("{} is not between 0 and 100", load),
                });
            }
        }

        if let Some(size) = self
            .memory_stressor
            .as_ref()
            .and_then(|memory| memory.size.as_deref())
            .filter(|s| !s.is_empty())
        {
            parse_quantity(size)?;
        }

        Ok(())
    }
}

fn push_options(args: &mut String, options: &[String]) {
    for option in options {
        args.push_str(&format!(" {} ", option));
    }
}
