//! Wire schema of the Stardoc documentation descriptor.
//!
//! Mirrors the `ModuleInfo` message family of `stardoc_output.proto`. Only the
//! fields regdoc consumes are declared; everything else on the wire is skipped
//! by the decoder.

/// Documentation extracted from one `.bzl` file.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModuleInfo {
    #[prost(message, repeated, tag = "1")]
    pub rule_info: Vec<RuleInfo>,
    #[prost(message, repeated, tag = "2")]
    pub provider_info: Vec<ProviderInfo>,
    #[prost(message, repeated, tag = "3")]
    pub func_info: Vec<StarlarkFunctionInfo>,
    #[prost(message, repeated, tag = "4")]
    pub aspect_info: Vec<AspectInfo>,
    #[prost(string, tag = "5")]
    pub module_docstring: String,
    #[prost(string, tag = "6")]
    pub file: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RuleInfo {
    #[prost(string, tag = "1")]
    pub rule_name: String,
    #[prost(string, tag = "2")]
    pub doc_string: String,
    #[prost(message, repeated, tag = "3")]
    pub attribute: Vec<AttributeInfo>,
    #[prost(message, optional, tag = "4")]
    pub origin_key: Option<OriginKey>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AttributeInfo {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub doc_string: String,
    #[prost(enumeration = "AttributeType", tag = "3")]
    pub r#type: i32,
    #[prost(bool, tag = "4")]
    pub mandatory: bool,
    #[prost(string, tag = "6")]
    pub default_value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AttributeType {
    Unknown = 0,
    Name = 1,
    Int = 2,
    Label = 3,
    String = 4,
    StringList = 5,
    IntList = 6,
    LabelList = 7,
    Boolean = 8,
    LabelStringDict = 9,
    StringDict = 10,
    StringListDict = 11,
    Output = 12,
    OutputList = 13,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StarlarkFunctionInfo {
    #[prost(string, tag = "1")]
    pub function_name: String,
    #[prost(message, repeated, tag = "2")]
    pub parameter: Vec<FunctionParamInfo>,
    #[prost(string, tag = "3")]
    pub doc_string: String,
    #[prost(message, optional, tag = "4")]
    pub r#return: Option<FunctionReturnInfo>,
    #[prost(message, optional, tag = "5")]
    pub deprecated: Option<FunctionDeprecationInfo>,
    #[prost(message, optional, tag = "6")]
    pub origin_key: Option<OriginKey>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FunctionParamInfo {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub doc_string: String,
    #[prost(string, tag = "3")]
    pub default_value: String,
    #[prost(bool, tag = "4")]
    pub mandatory: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FunctionReturnInfo {
    #[prost(string, tag = "1")]
    pub doc_string: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FunctionDeprecationInfo {
    #[prost(string, tag = "1")]
    pub doc_string: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProviderFieldInfo {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub doc_string: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProviderInfo {
    #[prost(string, tag = "1")]
    pub provider_name: String,
    #[prost(string, tag = "2")]
    pub doc_string: String,
    #[prost(message, repeated, tag = "3")]
    pub field_info: Vec<ProviderFieldInfo>,
    #[prost(message, optional, tag = "4")]
    pub origin_key: Option<OriginKey>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AspectInfo {
    #[prost(string, tag = "1")]
    pub aspect_name: String,
    #[prost(string, tag = "2")]
    pub doc_string: String,
    #[prost(string, repeated, tag = "3")]
    pub aspect_attribute: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub attribute: Vec<AttributeInfo>,
    #[prost(message, optional, tag = "5")]
    pub origin_key: Option<OriginKey>,
}

/// Definition site of an entity. Decoded but not carried into the model.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OriginKey {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub file: String,
}
