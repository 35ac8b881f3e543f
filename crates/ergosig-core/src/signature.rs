//! Signature builder - assembles parsed fields into a role-tagged registry
//!
//! # Pipeline
//!
//! `spec(s) → SpecList → parse_field per spec → SignatureField → Signature`
//!
//! # Guarantees
//!
//! - **Ordered**: inputs keep their order, then outputs keep theirs
//! - **Unique**: a field name appears once across inputs and outputs
//! - **All or nothing**: any bad spec fails the whole build

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::BuildOptions;
use crate::parser::ast::{FieldDescriptor, FieldSpec, FieldType};
use crate::parser::parse_field;
use crate::{Error, Result};

// ── Roles & registry entries ───────────────────────────────

/// Which side of the signature a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Input,
    Output,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldRole::Input => write!(f, "input"),
            FieldRole::Output => write!(f, "output"),
        }
    }
}

/// A descriptor tagged with its role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureField {
    pub role: FieldRole,
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
}

// ── Spec lists ─────────────────────────────────────────────

/// One spec or an ordered sequence of specs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecList {
    One(FieldSpec),
    Many(Vec<FieldSpec>),
}

impl SpecList {
    fn into_specs(self, options: &BuildOptions) -> Vec<FieldSpec> {
        match self {
            SpecList::One(FieldSpec::Text(text))
                if options.legacy_comma_split && text.contains(',') =>
            {
                text.split(',')
                    .map(|part| FieldSpec::Text(part.trim().to_string()))
                    .collect()
            }
            SpecList::One(spec) => vec![spec],
            SpecList::Many(specs) => specs,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, SpecList::Many(specs) if specs.is_empty())
    }
}

impl From<FieldSpec> for SpecList {
    fn from(spec: FieldSpec) -> Self {
        SpecList::One(spec)
    }
}

impl From<&str> for SpecList {
    fn from(s: &str) -> Self {
        SpecList::One(s.into())
    }
}

impl From<String> for SpecList {
    fn from(s: String) -> Self {
        SpecList::One(s.into())
    }
}

impl From<(&str, FieldType)> for SpecList {
    fn from(spec: (&str, FieldType)) -> Self {
        SpecList::One(spec.into())
    }
}

impl From<(&str, &str)> for SpecList {
    fn from(spec: (&str, &str)) -> Self {
        SpecList::One(spec.into())
    }
}

impl From<(&str, FieldType, &str)> for SpecList {
    fn from(spec: (&str, FieldType, &str)) -> Self {
        SpecList::One(spec.into())
    }
}

impl<T: Into<FieldSpec>> From<Vec<T>> for SpecList {
    fn from(specs: Vec<T>) -> Self {
        SpecList::Many(specs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldSpec>, const N: usize> From<[T; N]> for SpecList {
    fn from(specs: [T; N]) -> Self {
        SpecList::Many(specs.into_iter().map(Into::into).collect())
    }
}

// ── Signature ──────────────────────────────────────────────

/// Named, typed, role-tagged input and output fields plus an optional instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    instruction: Option<String>,
    fields: IndexMap<String, SignatureField>,
}

impl Signature {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    /// Instruction text, or `""` when none was given
    pub fn doc(&self) -> &str {
        self.instruction().unwrap_or("")
    }

    /// All fields in declaration order, inputs first
    pub fn iter(&self) -> impl Iterator<Item = &SignatureField> {
        self.fields.values()
    }

    pub fn input_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.with_role(FieldRole::Input)
    }

    pub fn output_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.with_role(FieldRole::Output)
    }

    pub fn field(&self, name: &str) -> Option<&SignatureField> {
        self.fields.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_with_role(name, FieldRole::Input)
    }

    pub fn output(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_with_role(name, FieldRole::Output)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON form handed to an external prompting engine
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "instruction": self.instruction,
            "inputs": self.input_fields().collect::<Vec<_>>(),
            "outputs": self.output_fields().collect::<Vec<_>>(),
        })
    }

    fn with_role(&self, role: FieldRole) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .values()
            .filter(move |f| f.role == role)
            .map(|f| &f.descriptor)
    }

    fn field_with_role(&self, name: &str, role: FieldRole) -> Option<&FieldDescriptor> {
        self.fields
            .get(name)
            .filter(|f| f.role == role)
            .map(|f| &f.descriptor)
    }
}

// ── Builder ────────────────────────────────────────────────

/// Fluent builder for a `Signature`
///
/// # Example
/// ```
/// use ergosig::{FieldType, SignatureBuilder};
///
/// let sig = SignatureBuilder::new()
///     .inputs(["question", "context: list[str]"])
///     .outputs("answer: str; The response")
///     .instruction("Answer from the context only")
///     .build()
///     .unwrap();
///
/// assert_eq!(sig.input("context").unwrap().field_type, FieldType::list(FieldType::String));
/// assert_eq!(sig.output("answer").unwrap().description.as_deref(), Some("The response"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignatureBuilder {
    inputs: Option<SpecList>,
    outputs: Option<SpecList>,
    instruction: String,
    options: BuildOptions,
}

impl SignatureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        SignatureBuilder {
            options,
            ..Self::default()
        }
    }

    pub fn inputs(mut self, specs: impl Into<SpecList>) -> Self {
        self.inputs = Some(specs.into());
        self
    }

    pub fn outputs(mut self, specs: impl Into<SpecList>) -> Self {
        self.outputs = Some(specs.into());
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Parse every spec and assemble the signature
    ///
    /// # Errors
    /// - `MissingSpecError` when outputs were never set or are an empty
    ///   sequence, or inputs were never set
    /// - `MalformedSpecError` from the first spec that fails to parse
    /// - `DuplicateFieldError` when a name repeats, unless
    ///   `allow_duplicate_names` is set
    pub fn build(self) -> Result<Signature> {
        let outputs = match self.outputs {
            Some(outputs) if !outputs.is_empty() => outputs,
            _ => {
                return Err(Error::MissingSpecError {
                    role: FieldRole::Output,
                })
            }
        };
        let inputs = self.inputs.ok_or(Error::MissingSpecError {
            role: FieldRole::Input,
        })?;

        let mut fields = IndexMap::new();
        for (role, specs) in [(FieldRole::Input, inputs), (FieldRole::Output, outputs)] {
            for spec in specs.into_specs(&self.options) {
                let descriptor = parse_field(&spec)?;
                register(&mut fields, SignatureField { role, descriptor }, &self.options)?;
            }
        }

        let instruction = self.instruction.trim();
        let signature = Signature {
            name: self.options.signature_name.clone(),
            instruction: (!instruction.is_empty()).then(|| instruction.to_string()),
            fields,
        };

        tracing::debug!(
            signature = %signature.name,
            inputs = signature.input_fields().count(),
            outputs = signature.output_fields().count(),
            "built signature"
        );
        Ok(signature)
    }
}

fn register(
    fields: &mut IndexMap<String, SignatureField>,
    field: SignatureField,
    options: &BuildOptions,
) -> Result<()> {
    match fields.entry(field.descriptor.name.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(field);
        }
        Entry::Occupied(mut slot) => {
            if !options.allow_duplicate_names {
                return Err(Error::DuplicateFieldError {
                    name: field.descriptor.name,
                    first: slot.get().role,
                    second: field.role,
                });
            }
            tracing::warn!(
                name = %field.descriptor.name,
                first = %slot.get().role,
                second = %field.role,
                "duplicate field name, replacing earlier declaration"
            );
            slot.insert(field);
        }
    }
    Ok(())
}

/// Build a signature from input specs, output specs and an instruction
///
/// `outputs` is an `Option` so a caller forwarding its own optional argument
/// gets `MissingSpecError` rather than a silently output-less signature.
///
/// # Example
/// ```
/// use ergosig::{build_signature, FieldType};
///
/// let sig = build_signature(
///     ["topic", "audience: str; Target audience"],
///     Some(["setup", "punchline", "rating: float; Score 1-10"].into()),
///     "You are a professional comedian",
/// )
/// .unwrap();
///
/// assert_eq!(sig.input_fields().count(), 2);
/// assert_eq!(sig.output("rating").unwrap().field_type, FieldType::Float);
/// ```
pub fn build_signature(
    inputs: impl Into<SpecList>,
    outputs: Option<SpecList>,
    instruction: &str,
) -> Result<Signature> {
    let mut builder = SignatureBuilder::new().inputs(inputs).instruction(instruction);
    if let Some(outputs) = outputs {
        builder = builder.outputs(outputs);
    }
    builder.build()
}
