//! Descriptor detection and decoding.

use prost::Message;
use regdoc_archive::{ArchiveEntry, EntryKind};

use crate::model::DocumentInfo;
use crate::proto::ModuleInfo;

/// Filename suffix of Stardoc binary descriptors.
pub const DESCRIPTOR_SUFFIX: &str = ".binaryproto";

/// Whether an archive member holds a documentation descriptor.
pub fn is_descriptor(entry: &ArchiveEntry) -> bool {
    entry.kind == EntryKind::File && entry.name.ends_with(DESCRIPTOR_SUFFIX)
}

/// Decode one binary descriptor into the plain model.
///
/// Unknown fields are skipped; missing fields take their proto3 defaults.
///
/// # Errors
///
/// Returns the underlying decode error if `bytes` is not a well-formed
/// `ModuleInfo` message.
pub fn decode_descriptor(bytes: &[u8]) -> Result<DocumentInfo, prost::DecodeError> {
    ModuleInfo::decode(bytes).map(DocumentInfo::from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::AttributeType;
    use crate::proto;

    fn entry(name: &str, kind: EntryKind) -> ArchiveEntry {
        ArchiveEntry {
            name: name.to_owned(),
            kind,
            content: Vec::new(),
        }
    }

    #[test]
    fn test_is_descriptor() {
        assert!(is_descriptor(&entry("defs.binaryproto", EntryKind::File)));
        assert!(is_descriptor(&entry("a/b/defs.binaryproto", EntryKind::File)));
        assert!(!is_descriptor(&entry("defs.md", EntryKind::File)));
        assert!(!is_descriptor(&entry("defs.binaryproto.bak", EntryKind::File)));
        assert!(!is_descriptor(&entry("dir.binaryproto", EntryKind::Other)));
    }

    #[test]
    fn test_decode_descriptor() {
        let module = ModuleInfo {
            file: "//lib:defs.bzl".to_owned(),
            module_docstring: "Docs.".to_owned(),
            ..Default::default()
        };
        let doc = decode_descriptor(&module.encode_to_vec()).unwrap();
        assert_eq!(doc.file, "//lib:defs.bzl");
        assert_eq!(doc.module_docstring.as_deref(), Some("Docs."));
        assert!(doc.functions.is_empty());
    }

    fn origin(name: &str) -> Option<proto::OriginKey> {
        Some(proto::OriginKey {
            name: name.to_owned(),
            file: "//pkg:defs.bzl".to_owned(),
        })
    }

    /// One attribute per wire type value, plus one outside the enum.
    fn attribute_per_type() -> Vec<proto::AttributeInfo> {
        (0..=13)
            .chain([42])
            .map(|wire| proto::AttributeInfo {
                name: format!("attr_{wire}"),
                doc_string: format!("Type {wire}."),
                r#type: wire,
                mandatory: wire % 2 == 0,
                default_value: if wire % 2 == 0 {
                    String::new()
                } else {
                    format!("\"{wire}\"")
                },
            })
            .collect()
    }

    fn fully_populated() -> ModuleInfo {
        ModuleInfo {
            file: "//pkg:defs.bzl".to_owned(),
            module_docstring: "Packaging rules.".to_owned(),
            rule_info: vec![proto::RuleInfo {
                rule_name: "pkg_tar".to_owned(),
                doc_string: "Creates a tar file.".to_owned(),
                attribute: attribute_per_type(),
                origin_key: origin("pkg_tar"),
            }],
            provider_info: vec![proto::ProviderInfo {
                provider_name: "PackageInfo".to_owned(),
                doc_string: "Package metadata.".to_owned(),
                field_info: vec![
                    proto::ProviderFieldInfo {
                        name: "version".to_owned(),
                        doc_string: "Package version.".to_owned(),
                    },
                    proto::ProviderFieldInfo {
                        name: "url".to_owned(),
                        doc_string: String::new(),
                    },
                ],
                origin_key: origin("PackageInfo"),
            }],
            func_info: vec![proto::StarlarkFunctionInfo {
                function_name: "pkg_files".to_owned(),
                doc_string: "Collect files.".to_owned(),
                parameter: vec![
                    proto::FunctionParamInfo {
                        name: "name".to_owned(),
                        doc_string: "Target name.".to_owned(),
                        default_value: String::new(),
                        mandatory: true,
                    },
                    proto::FunctionParamInfo {
                        name: "strip_prefix".to_owned(),
                        doc_string: String::new(),
                        default_value: "\".\"".to_owned(),
                        mandatory: false,
                    },
                ],
                r#return: Some(proto::FunctionReturnInfo {
                    doc_string: "A PackageFilesInfo provider.".to_owned(),
                }),
                deprecated: Some(proto::FunctionDeprecationInfo {
                    doc_string: "Use pkg_filegroup.".to_owned(),
                }),
                origin_key: origin("pkg_files"),
            }],
            aspect_info: vec![proto::AspectInfo {
                aspect_name: "pkg_aspect".to_owned(),
                doc_string: "Collects package inputs.".to_owned(),
                aspect_attribute: vec!["deps".to_owned(), "srcs".to_owned()],
                attribute: vec![proto::AttributeInfo {
                    name: "mode".to_owned(),
                    r#type: proto::AttributeType::String as i32,
                    default_value: "\"0644\"".to_owned(),
                    ..Default::default()
                }],
                origin_key: origin("pkg_aspect"),
            }],
        }
    }

    #[test]
    fn test_fully_populated_descriptor() {
        let module = fully_populated();
        let bytes = module.encode_to_vec();

        assert_eq!(ModuleInfo::decode(bytes.as_slice()).unwrap(), module);
        let doc = decode_descriptor(&bytes).unwrap();
        assert_eq!(doc, DocumentInfo::from(module));

        let types: Vec<AttributeType> = doc.rules[0]
            .attributes
            .iter()
            .map(|a| a.attr_type)
            .collect();
        assert_eq!(
            types,
            vec![
                AttributeType::Unknown,
                AttributeType::Name,
                AttributeType::Int,
                AttributeType::Label,
                AttributeType::String,
                AttributeType::StringList,
                AttributeType::IntList,
                AttributeType::LabelList,
                AttributeType::Boolean,
                AttributeType::LabelStringDict,
                AttributeType::StringDict,
                AttributeType::StringListDict,
                AttributeType::Output,
                AttributeType::OutputList,
                AttributeType::Unrecognized(42),
            ]
        );
        assert_eq!(doc.rules[0].attributes[1].default_value.as_deref(), Some("\"1\""));
        assert_eq!(doc.rules[0].attributes[2].default_value, None);

        let func = &doc.functions[0];
        assert_eq!(func.returns.as_deref(), Some("A PackageFilesInfo provider."));
        assert_eq!(func.deprecated.as_deref(), Some("Use pkg_filegroup."));
        assert_eq!(func.parameters[1].doc_string, None);
        assert_eq!(doc.providers[0].fields[1].doc_string, None);
        assert_eq!(doc.aspects[0].aspect_attributes, vec!["deps", "srcs"]);
        assert_eq!(doc.aspects[0].attributes[0].attr_type, AttributeType::String);

        let json = serde_json::to_string(&doc).unwrap();
        let back: DocumentInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_empty_bytes_decode_to_default() {
        let doc = decode_descriptor(&[]).unwrap();
        assert_eq!(doc, DocumentInfo::default());
    }

    #[test]
    fn test_truncated_descriptor_fails() {
        // Field 1, length-delimited, claims 32 bytes but only one follows
        assert!(decode_descriptor(&[0x0a, 0x20, 0x01]).is_err());
    }
}
