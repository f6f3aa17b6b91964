//! Plain documentation model.
//!
//! Decoded descriptors are normalized into these types before anything else
//! sees them: proto3 empty strings become `None`, origin keys and unknown wire
//! fields are dropped, and attribute types become a closed enum. The result is
//! acyclic and survives a JSON encode/decode unchanged.

use serde::{Deserialize, Serialize};

use crate::proto;

/// Documentation for one source file.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Source file label. Identity and sort key of the document.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_docstring: Option<String>,
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
    #[serde(default)]
    pub rules: Vec<RuleInfo>,
    #[serde(default)]
    pub providers: Vec<ProviderInfo>,
    #[serde(default)]
    pub aspects: Vec<AspectInfo>,
}

/// A function or macro.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    /// Description of the return value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// Deprecation notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A build rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
}

/// A rule or aspect attribute.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
}

/// Declared type of an attribute.
///
/// `Unknown` and `Unrecognized` are carried through normalization so the
/// renderer can reject them instead of guessing a description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    Unknown,
    Name,
    Int,
    Label,
    String,
    StringList,
    IntList,
    LabelList,
    Boolean,
    LabelStringDict,
    StringDict,
    StringListDict,
    Output,
    OutputList,
    /// Wire value outside the known set.
    Unrecognized(i32),
}

impl AttributeType {
    /// Map a raw wire value to the closed set.
    pub fn from_wire(value: i32) -> Self {
        match proto::AttributeType::try_from(value) {
            Ok(proto::AttributeType::Unknown) => Self::Unknown,
            Ok(proto::AttributeType::Name) => Self::Name,
            Ok(proto::AttributeType::Int) => Self::Int,
            Ok(proto::AttributeType::Label) => Self::Label,
            Ok(proto::AttributeType::String) => Self::String,
            Ok(proto::AttributeType::StringList) => Self::StringList,
            Ok(proto::AttributeType::IntList) => Self::IntList,
            Ok(proto::AttributeType::LabelList) => Self::LabelList,
            Ok(proto::AttributeType::Boolean) => Self::Boolean,
            Ok(proto::AttributeType::LabelStringDict) => Self::LabelStringDict,
            Ok(proto::AttributeType::StringDict) => Self::StringDict,
            Ok(proto::AttributeType::StringListDict) => Self::StringListDict,
            Ok(proto::AttributeType::Output) => Self::Output,
            Ok(proto::AttributeType::OutputList) => Self::OutputList,
            Err(_) => Self::Unrecognized(value),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    /// Rule attributes the aspect propagates along.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aspect_attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInfo>,
}

/// Proto3 has no absent strings; treat empty as unset.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl From<proto::ModuleInfo> for DocumentInfo {
    fn from(module: proto::ModuleInfo) -> Self {
        Self {
            file: module.file,
            module_docstring: non_empty(module.module_docstring),
            functions: module.func_info.into_iter().map(Into::into).collect(),
            rules: module.rule_info.into_iter().map(Into::into).collect(),
            providers: module.provider_info.into_iter().map(Into::into).collect(),
            aspects: module.aspect_info.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::StarlarkFunctionInfo> for FunctionInfo {
    fn from(func: proto::StarlarkFunctionInfo) -> Self {
        Self {
            name: func.function_name,
            doc_string: non_empty(func.doc_string),
            parameters: func.parameter.into_iter().map(Into::into).collect(),
            returns: func.r#return.and_then(|r| non_empty(r.doc_string)),
            deprecated: func.deprecated.and_then(|d| non_empty(d.doc_string)),
        }
    }
}

impl From<proto::FunctionParamInfo> for ParameterInfo {
    fn from(param: proto::FunctionParamInfo) -> Self {
        Self {
            name: param.name,
            doc_string: non_empty(param.doc_string),
            mandatory: param.mandatory,
            default_value: non_empty(param.default_value),
        }
    }
}

impl From<proto::RuleInfo> for RuleInfo {
    fn from(rule: proto::RuleInfo) -> Self {
        Self {
            name: rule.rule_name,
            doc_string: non_empty(rule.doc_string),
            attributes: rule.attribute.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::AttributeInfo> for AttributeInfo {
    fn from(attr: proto::AttributeInfo) -> Self {
        Self {
            name: attr.name,
            doc_string: non_empty(attr.doc_string),
            mandatory: attr.mandatory,
            default_value: non_empty(attr.default_value),
            attr_type: AttributeType::from_wire(attr.r#type),
        }
    }
}

impl From<proto::ProviderInfo> for ProviderInfo {
    fn from(provider: proto::ProviderInfo) -> Self {
        Self {
            name: provider.provider_name,
            doc_string: non_empty(provider.doc_string),
            fields: provider
                .field_info
                .into_iter()
                .map(|field| FieldInfo {
                    name: field.name,
                    doc_string: non_empty(field.doc_string),
                })
                .collect(),
        }
    }
}

impl From<proto::AspectInfo> for AspectInfo {
    fn from(aspect: proto::AspectInfo) -> Self {
        Self {
            name: aspect.aspect_name,
            doc_string: non_empty(aspect.doc_string),
            aspect_attributes: aspect.aspect_attribute,
            attributes: aspect.attribute.into_iter().map(Into::into).collect(),
        }
    }
}
